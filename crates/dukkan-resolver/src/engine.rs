// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message-to-order pipeline.
//!
//! One [`OrderResolver`] instance serves a deployment. Each inbound message
//! runs through the stages in a fixed order:
//!
//! 1. duplicate guard (read-only check)
//! 2. pending-selection handling (resume, re-prompt, or reject a stray reply)
//! 3. duplicate recording (atomic check-and-record)
//! 4. fresh parse: classify, geography, products, inventory, assembly
//!
//! Selection replies replay the original message with the chosen candidate
//! pinned; they are never recorded by the duplicate guard, so answering a
//! prompt twice is caught by the session state, not by text hashing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dukkan_config::DukkanConfig;
use dukkan_core::error::DukkanError;
use dukkan_core::traits::{Notifier, OrderSink, ReferenceStore};
use dukkan_core::types::{
    City, CityId, InboundMessage, OrderLine, Product, Region, RegionId, RejectReason,
    ResolveOutcome, StockAlert,
};
use dukkan_storage::Database;
use dukkan_storage::queries::{processed, selections};
use tracing::{debug, info, warn};

use crate::classify::{self, MessageParts};
use crate::geography::RegionDecision;
use crate::product::ProductDecision;
use crate::session::SelectionPin;
use crate::{assemble, dedupe, geography, inventory, product, render, session};

/// Outcome of the geography stage: either a usable city/region pair or a
/// terminal pipeline outcome (prompt or rejection).
enum GeographyStage {
    Resolved { city: City, region: Region },
    Terminal(ResolveOutcome),
}

/// The resolver engine. Holds the configuration, the session database, and
/// the three host collaborators.
pub struct OrderResolver {
    config: DukkanConfig,
    db: Database,
    store: Arc<dyn ReferenceStore>,
    sink: Arc<dyn OrderSink>,
    notifier: Arc<dyn Notifier>,
}

impl OrderResolver {
    pub fn new(
        config: DukkanConfig,
        db: Database,
        store: Arc<dyn ReferenceStore>,
        sink: Arc<dyn OrderSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            db,
            store,
            sink,
            notifier,
        }
    }

    pub fn config(&self) -> &DukkanConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Run one inbound message through the pipeline, deliver the resulting
    /// note, and return the typed outcome.
    pub async fn handle_message(
        &self,
        message: &InboundMessage,
    ) -> Result<ResolveOutcome, DukkanError> {
        let now = Utc::now();
        let outcome = self.resolve(message, now).await?;
        let note = render::render_outcome(&outcome);
        self.notifier.send(&message.conversation_id, &note).await?;
        info!(
            conversation = %message.conversation_id,
            source = message.source.as_str(),
            note = %note.kind,
            "message handled"
        );
        Ok(outcome)
    }

    /// Run one inbound message through the pipeline without dispatching a
    /// note. Hosts that render and deliver replies themselves call this
    /// instead of [`handle_message`](Self::handle_message); `now` anchors
    /// the dedupe window and selection expiry.
    pub async fn resolve(
        &self,
        message: &InboundMessage,
        now: DateTime<Utc>,
    ) -> Result<ResolveOutcome, DukkanError> {
        let window_start = now - self.config.sessions.dedupe_window();
        let hash = dedupe::text_hash(&message.text);

        // Duplicates short-circuit everything, selection replies included.
        if processed::is_duplicate(&self.db, &message.conversation_id, &hash, window_start).await? {
            debug!(conversation = %message.conversation_id, "duplicate message suppressed");
            return Ok(ResolveOutcome::DuplicateAck);
        }

        // A pending selection claims the next interpretable reply. Peek
        // rather than take: an uninterpretable reply must leave the session
        // in place for the re-prompt.
        if let Some(selection) =
            selections::peek_selection(&self.db, &message.conversation_id, now).await?
        {
            return match session::interpret_reply(&message.text, &selection, &self.config.matching)
            {
                Some(choice) => self.resume_selection(message, choice, now).await,
                None => {
                    debug!(
                        conversation = %message.conversation_id,
                        kind = %selection.kind,
                        "uninterpretable reply while a selection is pending"
                    );
                    Ok(ResolveOutcome::InvalidSelection(selection))
                }
            };
        }

        // A bare number with nothing pending is a stray selection reply,
        // typically an answer to an already-consumed or expired prompt.
        if session::bare_integer(&message.text).is_some() {
            return Ok(ResolveOutcome::NoPendingSelection);
        }

        // Record before parsing so a concurrent redelivery of the same text
        // lands on the duplicate path instead of parsing twice.
        let record = dedupe::record_for(message, now);
        if processed::check_and_record(&self.db, &record, window_start).await? {
            return Ok(ResolveOutcome::DuplicateAck);
        }

        self.parse_message(message, &message.text, None, now).await
    }

    /// Consume the pending selection and replay its original message with
    /// the chosen candidate pinned.
    async fn resume_selection(
        &self,
        message: &InboundMessage,
        choice: usize,
        now: DateTime<Utc>,
    ) -> Result<ResolveOutcome, DukkanError> {
        // Atomic take: two racing replies consume the session exactly once;
        // the loser is told nothing is pending.
        let Some(selection) =
            selections::take_selection(&self.db, &message.conversation_id, now).await?
        else {
            return Ok(ResolveOutcome::NoPendingSelection);
        };
        let Some(pin) = session::pin_for(&selection, choice) else {
            return Ok(ResolveOutcome::NoPendingSelection);
        };
        info!(
            conversation = %message.conversation_id,
            kind = %selection.kind,
            choice = choice + 1,
            "selection accepted, replaying original message"
        );
        self.parse_message(message, &selection.original_text, Some(pin), now)
            .await
    }

    /// The fresh-parse path: classification, geography, product matching,
    /// inventory, and assembly. `pin` carries a consumed selection into the
    /// replay.
    async fn parse_message(
        &self,
        message: &InboundMessage,
        text: &str,
        pin: Option<SelectionPin>,
        now: DateTime<Utc>,
    ) -> Result<ResolveOutcome, DukkanError> {
        let lines = classify::classify_message(text, &self.config.resolver);
        let parts = classify::split_parts(&lines);
        debug!(
            conversation = %message.conversation_id,
            product_lines = parts.product_lines.len(),
            has_phone = parts.phone.is_some(),
            "message classified"
        );

        let stage = match &pin {
            Some(SelectionPin::Region {
                city_id,
                city_name,
                region_id,
            }) => self.pinned_region(*city_id, city_name, *region_id).await?,
            _ => self.resolve_geography(message, text, &parts, now).await?,
        };
        let (city, region) = match stage {
            GeographyStage::Resolved { city, region } => (city, region),
            GeographyStage::Terminal(outcome) => return Ok(outcome),
        };

        let mut order_lines: Vec<OrderLine> = Vec::new();
        for (index, line) in parts.product_lines.iter().enumerate() {
            let draft = product::extract_line(line);
            if draft.name.is_empty() {
                return Ok(ResolveOutcome::Rejected(RejectReason::ProductNotFound {
                    line: draft.raw,
                }));
            }
            let candidates = self.search_catalog(&draft.name).await?;

            let matched = match &pin {
                Some(SelectionPin::Variant {
                    line_index,
                    product_id,
                }) if *line_index == index => {
                    // The catalog may have changed since the prompt went out.
                    match candidates.into_iter().find(|p| p.id == *product_id) {
                        Some(p) => p,
                        None => {
                            warn!(
                                conversation = %message.conversation_id,
                                product = %product_id,
                                "pinned product no longer matches the catalog"
                            );
                            return Ok(ResolveOutcome::Rejected(
                                RejectReason::ProductNotFound { line: draft.raw },
                            ));
                        }
                    }
                }
                _ => match product::rank_products(&candidates, &draft.name, &self.config.matching)
                {
                    ProductDecision::Matched(p) => p,
                    ProductDecision::Ambiguous(tied) => {
                        let selection = session::new_variant_selection(
                            &message.conversation_id,
                            index,
                            &tied,
                            text,
                            now,
                            self.config.sessions.selection_ttl(),
                        );
                        selections::upsert_selection(&self.db, &selection).await?;
                        info!(
                            conversation = %message.conversation_id,
                            candidates = selection.candidates.len(),
                            "product ambiguity, selection session opened"
                        );
                        return Ok(ResolveOutcome::SelectionPrompt(selection));
                    }
                    ProductDecision::NotFound => {
                        return Ok(ResolveOutcome::Rejected(RejectReason::ProductNotFound {
                            line: draft.raw,
                        }));
                    }
                },
            };

            let variant = product::select_variant(
                &matched,
                draft.color.as_deref(),
                draft.size.as_deref(),
            );
            if let Some(variant) = variant {
                let check = inventory::check_availability(variant, draft.quantity);
                if !check.available {
                    warn!(
                        conversation = %message.conversation_id,
                        product = matched.name.as_str(),
                        requested = draft.quantity,
                        remaining = check.remaining,
                        "insufficient stock"
                    );
                    return Ok(ResolveOutcome::StockAlert(StockAlert {
                        phone: parts
                            .phone
                            .clone()
                            .unwrap_or_else(|| render::PHONE_PLACEHOLDER.to_string()),
                        product_name: matched.name.clone(),
                        color: variant.color.clone().or_else(|| draft.color.clone()),
                        size: variant.size.clone().or_else(|| draft.size.clone()),
                        quantity: draft.quantity,
                    }));
                }
            }
            order_lines.push(assemble::order_line(&matched, variant, &draft));
        }

        match assemble::assemble_order(message, text, &parts, &city, &region, order_lines) {
            Ok(order) => {
                self.sink.persist_order(&order).await?;
                info!(
                    conversation = %message.conversation_id,
                    city = order.city_name.as_str(),
                    region = order.region_name.as_str(),
                    lines = order.lines.len(),
                    total = order.total,
                    "order resolved"
                );
                Ok(ResolveOutcome::Order(Box::new(order)))
            }
            Err(reason) => Ok(ResolveOutcome::Rejected(reason)),
        }
    }

    /// Geography for a fresh parse: city (with default fallback), then
    /// region over the address text with the city mention stripped.
    async fn resolve_geography(
        &self,
        message: &InboundMessage,
        text: &str,
        parts: &MessageParts,
        now: DateTime<Utc>,
    ) -> Result<GeographyStage, DukkanError> {
        let cities = self.store.cities().await?;
        let resolution = geography::resolve_city(&cities, &parts.address, &self.config.matching);
        let city = match resolution.best {
            Some(city) => city,
            None => {
                let default = &self.config.resolver.default_city;
                let Some(city) = geography::default_city_policy(&cities, default) else {
                    return Err(DukkanError::Config(format!(
                        "default city {default:?} is not in the reference data"
                    )));
                };
                debug!(city = city.name.as_str(), "address named no city, using default");
                city
            }
        };

        let regions = self.store.regions_of(city.id).await?;
        let remaining = geography::strip_city_needle(&parts.address, &city);
        let resolution = geography::resolve_region(&regions, &remaining);
        match geography::decide_region(&resolution, &regions, &self.config.matching) {
            RegionDecision::Auto(region) => {
                if !region_belongs_to_city(&region, city.id, &city.name) {
                    return Ok(GeographyStage::Terminal(ResolveOutcome::Rejected(
                        RejectReason::RegionNotFound {
                            city_name: city.name.clone(),
                        },
                    )));
                }
                debug!(
                    city = city.name.as_str(),
                    region = region.name.as_str(),
                    matched = resolution.matched_text.as_str(),
                    "geography resolved"
                );
                Ok(GeographyStage::Resolved { city, region })
            }
            RegionDecision::Ambiguous(candidates) => {
                let selection = session::new_region_selection(
                    &message.conversation_id,
                    &city,
                    &candidates,
                    text,
                    now,
                    self.config.sessions.selection_ttl(),
                );
                selections::upsert_selection(&self.db, &selection).await?;
                info!(
                    conversation = %message.conversation_id,
                    city = city.name.as_str(),
                    candidates = selection.candidates.len(),
                    "region ambiguity, selection session opened"
                );
                Ok(GeographyStage::Terminal(ResolveOutcome::SelectionPrompt(
                    selection,
                )))
            }
            RegionDecision::NotFound => Ok(GeographyStage::Terminal(ResolveOutcome::Rejected(
                RejectReason::RegionNotFound {
                    city_name: city.name.clone(),
                },
            ))),
        }
    }

    /// Geography for a replay with a region pin: look the region up by id
    /// instead of re-running the fuzzy scan.
    async fn pinned_region(
        &self,
        city_id: CityId,
        city_name: &str,
        region_id: RegionId,
    ) -> Result<GeographyStage, DukkanError> {
        let not_found = || {
            GeographyStage::Terminal(ResolveOutcome::Rejected(RejectReason::RegionNotFound {
                city_name: city_name.to_string(),
            }))
        };

        let cities = self.store.cities().await?;
        let Some(city) = cities.into_iter().find(|c| c.id == city_id) else {
            warn!(city = city_name, "pinned city vanished from the reference data");
            return Ok(not_found());
        };
        let regions = self.store.regions_of(city_id).await?;
        let Some(region) = regions.into_iter().find(|r| r.id == region_id) else {
            warn!(
                city = city_name,
                region = %region_id,
                "pinned region vanished from the reference data"
            );
            return Ok(not_found());
        };
        if !region_belongs_to_city(&region, city_id, city_name) {
            return Ok(not_found());
        }
        Ok(GeographyStage::Resolved { city, region })
    }

    /// Union of catalog search results over both spellings of the needle,
    /// de-duplicated by product id in first-seen order.
    async fn search_catalog(&self, name: &str) -> Result<Vec<Product>, DukkanError> {
        let mut out: Vec<Product> = Vec::new();
        for needle in product::needle_respellings(name) {
            for found in self.store.search_products(&needle).await? {
                if !out.iter().any(|p| p.id == found.id) {
                    out.push(found);
                }
            }
        }
        Ok(out)
    }
}

/// Reference-data invariant: a region row must belong to the city it was
/// fetched for. A mismatch means the store is serving corrupt joins; the
/// match is refused rather than silently mis-addressed.
fn region_belongs_to_city(region: &Region, city_id: CityId, city_name: &str) -> bool {
    if region.city_id == city_id {
        return true;
    }
    warn!(
        region = region.name.as_str(),
        region_city = %region.city_id,
        city = city_name,
        "region belongs to a different city, refusing the match"
    );
    debug_assert!(false, "region city mismatch");
    false
}
