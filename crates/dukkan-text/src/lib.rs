// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arabic text handling for the Dukkan order resolver.
//!
//! Two pure building blocks: [`normalize`] turns dialectal, diacritized,
//! inconsistently spelled Arabic into a canonical matching form, and
//! [`score`] turns two strings into a `[0, 1]` match confidence. Everything
//! the resolver compares goes through these.

pub mod normalize;
pub mod similarity;

pub use normalize::{normalize, unify_digits};
pub use similarity::score;
