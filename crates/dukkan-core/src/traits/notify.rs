// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery seam for rendered outbound notes.

use async_trait::async_trait;

use crate::error::DukkanError;
use crate::types::{ConversationId, OutboundNote};

/// Delivers rendered notes back to the conversation (or to operations staff,
/// for stock alerts; routing on [`crate::types::NoteKind`] is the host's
/// decision).
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(
        &self,
        conversation: &ConversationId,
        note: &OutboundNote,
    ) -> Result<(), DukkanError>;
}
