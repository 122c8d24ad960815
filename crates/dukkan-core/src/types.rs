// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the resolver pipeline and collaborator traits.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Identifiers ---

/// Unique identifier for a city in the reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityId(pub i64);

/// Unique identifier for a region within a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub i64);

/// Unique identifier for a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

/// Unique identifier for a product variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantId(pub i64);

/// Identifier for a messaging conversation, as assigned by the host channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Reference data ---

/// A city from the retailer's geography reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub active: bool,
}

/// A region (district/neighborhood) belonging to exactly one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub city_id: CityId,
    pub name: String,
    pub active: bool,
}

/// A catalog product with its sellable variants.
///
/// Prices are integer Iraqi dinars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub base_price: i64,
    pub active: bool,
    pub variants: Vec<Variant>,
}

/// A concrete color/size combination of a product, with an inventory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
    /// Variant-specific price; `None` falls back to the product base price.
    pub price: Option<i64>,
    pub on_hand: i64,
    pub reserved: i64,
}

impl Variant {
    /// Units currently available to sell.
    pub fn available(&self) -> i64 {
        self.on_hand - self.reserved
    }
}

// --- Messages ---

/// A raw inbound message handed to the resolver by the host integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub conversation_id: ConversationId,
    /// Channel tag the message arrived through (e.g. `telegram`, `whatsapp`).
    pub source: String,
    pub sender_name: Option<String>,
    pub text: String,
}

// --- Matching ---

/// A scored candidate produced by the geography or product resolvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: i64,
    pub name: String,
    pub score: f64,
}

// --- Disambiguation sessions ---

/// What kind of entity a pending selection is choosing between.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Region,
    Variant,
}

/// One option in a pending selection, shown to the user 1-indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCandidate {
    pub id: i64,
    pub label: String,
}

/// Kind-specific state needed to replay the original message once the user
/// has picked a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionContext {
    Region { city_id: CityId, city_name: String },
    Variant { line_index: usize },
}

/// A short-lived disambiguation session. At most one exists per conversation;
/// writing a new one replaces the old.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub conversation_id: ConversationId,
    pub kind: SelectionKind,
    pub candidates: Vec<SelectionCandidate>,
    /// The raw text of the message that produced the ambiguity, replayed on
    /// successful selection.
    pub original_text: String,
    pub context: SelectionContext,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingSelection {
    /// Whether this selection is past its TTL at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// --- Duplicate guard ---

/// Insert-only record of a message that entered the fresh-parse path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedMessage {
    pub conversation_id: ConversationId,
    /// Lowercase hex SHA-256 of the raw message text.
    pub text_hash: String,
    pub raw_text: String,
    pub processed_at: DateTime<Utc>,
}

// --- Resolved orders ---

/// A single resolved product line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: i64,
    pub line_total: i64,
}

/// A fully resolved order, ready for the persistence sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOrder {
    pub customer_name: String,
    pub phone: String,
    pub city_id: CityId,
    pub city_name: String,
    pub region_id: RegionId,
    pub region_name: String,
    /// The free-form address text from the message, joined in original order.
    pub address: String,
    pub lines: Vec<OrderLine>,
    /// Sum of line totals, recomputed at assembly.
    pub total: i64,
    pub source: String,
    pub conversation_id: ConversationId,
    pub raw_text: String,
}

// --- Stock alerts ---

/// Payload describing an out-of-stock request, routed to operations staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    pub phone: String,
    pub product_name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
}

// --- Outbound notifications ---

/// Category of an outbound note, used by hosts to route delivery.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Confirmation,
    SelectionPrompt,
    InvalidSelection,
    NoPendingSelection,
    StockAlert,
    DuplicateAck,
    Rejection,
}

/// A rendered message for the notification collaborator to deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundNote {
    pub kind: NoteKind,
    pub text: String,
}

// --- Resolution outcomes ---

/// Why a message could not be resolved into an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No region of the resolved city matched well enough. Region is
    /// mandatory; there is no fallback.
    RegionNotFound { city_name: String },
    /// A product line matched nothing in the catalog.
    ProductNotFound { line: String },
    /// No valid phone line was found in the message.
    MissingPhone,
    /// The message had no usable product line at all.
    MalformedMessage,
}

/// The typed result of running one inbound message through the resolver.
///
/// Every variant is an expected outcome; infrastructure failures surface as
/// [`crate::error::DukkanError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// The message resolved into a complete order.
    Order(Box<ResolvedOrder>),
    /// A near-tie needs the user to pick; a selection session was created.
    SelectionPrompt(PendingSelection),
    /// A selection session is pending but the reply was not interpretable;
    /// the session is untouched and the user is re-prompted.
    InvalidSelection(PendingSelection),
    /// The reply looked like a selection but no session is pending.
    NoPendingSelection,
    /// A requested variant had insufficient stock; terminal for the message.
    StockAlert(StockAlert),
    /// The exact message was already processed inside the suppression window.
    DuplicateAck,
    /// The message was understood but cannot become an order.
    Rejected(RejectReason),
}
