// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dukkan order resolver.
//!
//! This crate provides the domain types, error taxonomy, and collaborator
//! trait definitions used throughout the Dukkan workspace. The resolver
//! pipeline itself lives in `dukkan-resolver`.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DukkanError;
pub use types::{
    City, CityId, ConversationId, InboundMessage, MatchCandidate, NoteKind, OrderLine,
    OutboundNote, PendingSelection, ProcessedMessage, Product, ProductId, Region, RegionId,
    RejectReason, ResolveOutcome, ResolvedOrder, SelectionCandidate, SelectionContext,
    SelectionKind, StockAlert, Variant, VariantId,
};

// Re-export the collaborator traits at crate root.
pub use traits::{Notifier, OrderSink, ReferenceStore};
