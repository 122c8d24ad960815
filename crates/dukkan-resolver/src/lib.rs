// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution pipeline for the Dukkan order resolver.
//!
//! Turns free-form Arabic order messages into resolved orders, asking the
//! customer to disambiguate when matching genuinely ties.
//!
//! ## Architecture
//!
//! - [`classify`]: per-line role heuristics (phone, name, product, address)
//! - [`geography`]: city and region matching over the address text
//! - [`product`]: product line extraction, catalog and variant matching
//! - [`inventory`]: availability checks against variant snapshots
//! - [`session`]: disambiguation sessions and reply interpretation
//! - [`dedupe`]: hashing for the duplicate guard
//! - [`assemble`]: final order composition with mandatory-field checks
//! - [`render`]: Arabic notes for every outcome
//! - [`OrderResolver`]: the engine running the stages in order
//!
//! The engine is wired against the collaborator traits in `dukkan-core`;
//! hosts supply the reference data, the order sink, and note delivery.

pub mod assemble;
pub mod classify;
pub mod dedupe;
mod engine;
pub mod geography;
pub mod inventory;
pub mod product;
pub mod render;
pub mod session;
pub mod vocab;

pub use engine::OrderResolver;
