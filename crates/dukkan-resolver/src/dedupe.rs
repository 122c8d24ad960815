// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hashing for the duplicate guard.
//!
//! Duplicates are keyed on the exact raw text, not on semantic content, so
//! the check stays cheap and side-effect free. Only messages that enter the
//! fresh-parse path are ever recorded; selection replies are not.

use chrono::{DateTime, Utc};
use dukkan_core::types::{InboundMessage, ProcessedMessage};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the raw message text.
pub fn text_hash(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Idempotency record for a message about to be parsed.
pub fn record_for(message: &InboundMessage, now: DateTime<Utc>) -> ProcessedMessage {
    ProcessedMessage {
        conversation_id: message.conversation_id.clone(),
        text_hash: text_hash(&message.text),
        raw_text: message.text.clone(),
        processed_at: now,
    }
}

#[cfg(test)]
mod tests {
    use dukkan_core::types::ConversationId;

    use super::*;

    #[test]
    fn hash_is_stable_and_lowercase_hex() {
        // SHA-256 of the empty string.
        assert_eq!(
            text_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        let h = text_hash("احمد علي\n07701234567");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(h, text_hash("احمد علي\n07701234567"));
    }

    #[test]
    fn whitespace_changes_the_hash() {
        // The guard is exact-text, so even trailing whitespace is a new message.
        assert_ne!(text_hash("مرحبا"), text_hash("مرحبا "));
    }

    #[test]
    fn record_carries_the_raw_text_and_hash() {
        let message = InboundMessage {
            conversation_id: ConversationId("chat-9".to_string()),
            source: "telegram".to_string(),
            sender_name: None,
            text: "برشلونة ازرق لارج".to_string(),
        };
        let now = Utc::now();
        let record = record_for(&message, now);
        assert_eq!(record.conversation_id, message.conversation_id);
        assert_eq!(record.raw_text, message.text);
        assert_eq!(record.text_hash, text_hash(&message.text));
        assert_eq!(record.processed_at, now);
    }
}
