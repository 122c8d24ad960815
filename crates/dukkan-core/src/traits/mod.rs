// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the resolver engine is wired against.
//!
//! The engine embeds inside a host messaging integration. Everything that
//! touches the outside world (catalog/geography reads, order persistence,
//! message delivery) goes through these seams so hosts and tests can supply
//! their own implementations.

pub mod notify;
pub mod reference;
pub mod sink;

pub use notify::Notifier;
pub use reference::ReferenceStore;
pub use sink::OrderSink;
