// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities for Dukkan integration tests.
//!
//! ## Architecture
//!
//! - [`fixtures`]: in-memory reference store plus recording sink/notifier
//! - [`harness`]: builder-assembled engine over a temp-dir session database
//!
//! Tests construct a [`TestHarness`] with fixture data, drive it through
//! [`TestHarness::send`], and assert on the returned outcome, the recorded
//! orders, and the delivered notes.

pub mod fixtures;
pub mod harness;

pub use fixtures::{
    city, product, region, variant, FixtureReferenceStore, RecordingNotifier, RecordingSink,
};
pub use harness::{TestHarness, TestHarnessBuilder};
