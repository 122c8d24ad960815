// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations, grouped by table.

pub mod processed;
pub mod selections;
