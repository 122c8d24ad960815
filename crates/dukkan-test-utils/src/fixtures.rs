// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborators for deterministic testing.
//!
//! `FixtureReferenceStore` serves hand-built geography and catalog data.
//! `RecordingSink` and `RecordingNotifier` capture everything the engine
//! emits so tests can assert on persisted orders and delivered notes.

use async_trait::async_trait;
use dukkan_core::error::DukkanError;
use dukkan_core::traits::{Notifier, OrderSink, ReferenceStore};
use dukkan_core::types::{
    City, CityId, ConversationId, OutboundNote, Product, ProductId, Region, RegionId,
    ResolvedOrder, Variant, VariantId,
};
use dukkan_text::normalize;
use tokio::sync::Mutex;

/// An active city row.
pub fn city(id: i64, name: &str) -> City {
    City {
        id: CityId(id),
        name: name.to_string(),
        active: true,
    }
}

/// An active region row.
pub fn region(id: i64, city_id: i64, name: &str) -> Region {
    Region {
        id: RegionId(id),
        city_id: CityId(city_id),
        name: name.to_string(),
        active: true,
    }
}

/// An active product with the given variants.
pub fn product(id: i64, name: &str, base_price: i64, variants: Vec<Variant>) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        base_price,
        active: true,
        variants,
    }
}

/// A variant with no reservations.
pub fn variant(
    id: i64,
    product_id: i64,
    color: Option<&str>,
    size: Option<&str>,
    price: Option<i64>,
    on_hand: i64,
) -> Variant {
    Variant {
        id: VariantId(id),
        product_id: ProductId(product_id),
        color: color.map(str::to_string),
        size: size.map(str::to_string),
        price,
        on_hand,
        reserved: 0,
    }
}

/// Reference store backed by plain vectors.
///
/// `search_products` mirrors the production contract: containment in either
/// direction on normalized names, over-returning rather than under-returning.
#[derive(Default)]
pub struct FixtureReferenceStore {
    cities: Vec<City>,
    regions: Vec<Region>,
    products: Vec<Product>,
}

impl FixtureReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: City) -> Self {
        self.cities.push(city);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }
}

#[async_trait]
impl ReferenceStore for FixtureReferenceStore {
    async fn cities(&self) -> Result<Vec<City>, DukkanError> {
        Ok(self.cities.clone())
    }

    async fn regions_of(&self, city: CityId) -> Result<Vec<Region>, DukkanError> {
        Ok(self
            .regions
            .iter()
            .filter(|r| r.city_id == city)
            .cloned()
            .collect())
    }

    async fn search_products(&self, needle: &str) -> Result<Vec<Product>, DukkanError> {
        let needle = normalize(needle);
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .products
            .iter()
            .filter(|p| {
                let name = normalize(&p.name);
                name.contains(&needle) || needle.contains(&name)
            })
            .cloned()
            .collect())
    }
}

/// Order sink that appends every persisted order to a list.
#[derive(Default)]
pub struct RecordingSink {
    orders: Mutex<Vec<ResolvedOrder>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All orders persisted so far, in arrival order.
    pub async fn orders(&self) -> Vec<ResolvedOrder> {
        self.orders.lock().await.clone()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl OrderSink for RecordingSink {
    async fn persist_order(&self, order: &ResolvedOrder) -> Result<(), DukkanError> {
        self.orders.lock().await.push(order.clone());
        Ok(())
    }
}

/// Notifier that captures every delivered note.
#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<(ConversationId, OutboundNote)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All delivered notes, in delivery order.
    pub async fn notes(&self) -> Vec<(ConversationId, OutboundNote)> {
        self.notes.lock().await.clone()
    }

    /// The most recently delivered note, if any.
    pub async fn last_note(&self) -> Option<OutboundNote> {
        self.notes.lock().await.last().map(|(_, note)| note.clone())
    }

    pub async fn note_count(&self) -> usize {
        self.notes.lock().await.len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        conversation: &ConversationId,
        note: &OutboundNote,
    ) -> Result<(), DukkanError> {
        self.notes
            .lock()
            .await
            .push((conversation.clone(), note.clone()));
        Ok(())
    }
}
