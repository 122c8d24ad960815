// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end harness wiring a real engine to fixture collaborators.
//!
//! The harness opens a real session database in a temp directory, so the
//! duplicate guard and pending selections behave exactly as in production.

use std::sync::Arc;

use dukkan_config::DukkanConfig;
use dukkan_core::error::DukkanError;
use dukkan_core::traits::{Notifier, OrderSink, ReferenceStore};
use dukkan_core::types::{ConversationId, InboundMessage, ResolveOutcome};
use dukkan_resolver::OrderResolver;
use dukkan_storage::Database;
use uuid::Uuid;

use crate::fixtures::{FixtureReferenceStore, RecordingNotifier, RecordingSink};

/// Builder for [`TestHarness`].
#[derive(Default)]
pub struct TestHarnessBuilder {
    config: DukkanConfig,
    store: FixtureReferenceStore,
}

impl TestHarnessBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: DukkanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: FixtureReferenceStore) -> Self {
        self.store = store;
        self
    }

    pub async fn build(self) -> Result<TestHarness, DukkanError> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| DukkanError::Storage { source: e.into() })?;
        let db = Database::open_at(&temp_dir.path().join("test.db")).await?;

        let store = Arc::new(self.store);
        let sink = Arc::new(RecordingSink::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let resolver = OrderResolver::new(
            self.config,
            db,
            store.clone() as Arc<dyn ReferenceStore>,
            sink.clone() as Arc<dyn OrderSink>,
            notifier.clone() as Arc<dyn Notifier>,
        );

        Ok(TestHarness {
            resolver,
            store,
            sink,
            notifier,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired engine plus handles to its recording collaborators.
pub struct TestHarness {
    pub resolver: OrderResolver,
    pub store: Arc<FixtureReferenceStore>,
    pub sink: Arc<RecordingSink>,
    pub notifier: Arc<RecordingNotifier>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A fresh conversation id for an independent message thread.
    pub fn conversation(&self) -> ConversationId {
        ConversationId(Uuid::new_v4().to_string())
    }

    /// Run one message through the engine as if it arrived on `conversation`.
    pub async fn send(
        &self,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<ResolveOutcome, DukkanError> {
        let message = InboundMessage {
            conversation_id: conversation.clone(),
            source: "test".to_string(),
            sender_name: None,
            text: text.to_string(),
        };
        self.resolver.handle_message(&message).await
    }

    /// Same as [`send`](Self::send) but with a sender display name attached.
    pub async fn send_from(
        &self,
        conversation: &ConversationId,
        sender_name: &str,
        text: &str,
    ) -> Result<ResolveOutcome, DukkanError> {
        let message = InboundMessage {
            conversation_id: conversation.clone(),
            source: "test".to_string(),
            sender_name: Some(sender_name.to_string()),
            text: text.to_string(),
        };
        self.resolver.handle_message(&message).await
    }

    pub fn database(&self) -> &Database {
        self.resolver.database()
    }
}
