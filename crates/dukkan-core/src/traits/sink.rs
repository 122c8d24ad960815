// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence seam for fully resolved orders.

use async_trait::async_trait;

use crate::error::DukkanError;
use crate::types::ResolvedOrder;

/// Destination for resolved orders (the retailer's order system).
///
/// Called exactly once per resolved order, after assembly validated all
/// mandatory fields. Identity assignment belongs to the sink.
#[async_trait]
pub trait OrderSink: Send + Sync + 'static {
    async fn persist_order(&self, order: &ResolvedOrder) -> Result<(), DukkanError>;
}
