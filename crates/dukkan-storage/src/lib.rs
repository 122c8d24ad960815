// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Dukkan order resolver.
//!
//! Owns the conversation-scoped state the resolver keeps between messages:
//! pending selection prompts and the processed-message log that backs the
//! duplicate guard. Reference data (geography, catalog) lives behind the
//! `ReferenceStore` seam and is not stored here.
//!
//! ## Architecture
//!
//! - **Database**: async connection handle, applies pragmas and migrations
//! - **migrations**: embedded refinery migrations
//! - **models**: row mapping and timestamp rendering
//! - **queries::selections**: upsert / peek / take of pending selections
//! - **queries::processed**: atomic duplicate check-and-record
//!
//! All timestamps are rendered in Rust as fixed-width RFC 3339 UTC strings,
//! so string comparison in SQL is chronologically correct.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
