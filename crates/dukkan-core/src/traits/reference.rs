// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only access to the retailer's geography and catalog reference data.

use async_trait::async_trait;

use crate::error::DukkanError;
use crate::types::{City, CityId, Product, Region};

/// Source of geography and catalog snapshots.
///
/// The engine only ever reads. Implementations typically front the
/// retailer's backend service; tests use an in-memory store.
#[async_trait]
pub trait ReferenceStore: Send + Sync + 'static {
    /// All cities, including inactive ones. The engine filters on `active`.
    async fn cities(&self) -> Result<Vec<City>, DukkanError>;

    /// All regions belonging to the given city.
    async fn regions_of(&self, city: CityId) -> Result<Vec<Region>, DukkanError>;

    /// Products whose name is related to `needle` by substring containment
    /// in either direction, compared on normalized text.
    ///
    /// Implementations may over-return; the engine re-scores and ranks every
    /// result. Under-returning loses matches, over-returning only costs time.
    async fn search_products(&self, needle: &str) -> Result<Vec<Product>, DukkanError>;
}
