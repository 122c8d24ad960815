// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duplicate-guard operations over the processed-messages log.
//!
//! Rows are insert-only. Pruning of rows older than the suppression window
//! happens opportunistically inside the record transaction, so the log stays
//! bounded without a sweeper.

use chrono::{DateTime, Utc};
use dukkan_core::types::{ConversationId, ProcessedMessage};
use dukkan_core::DukkanError;
use rusqlite::params;

use crate::database::Database;
use crate::models;

/// Read-only duplicate probe: does an identical message exist inside the
/// window?
pub async fn is_duplicate(
    db: &Database,
    conversation: &ConversationId,
    text_hash: &str,
    window_start: DateTime<Utc>,
) -> Result<bool, DukkanError> {
    let conversation_id = conversation.0.clone();
    let text_hash = text_hash.to_string();
    let cutoff = models::render_ts(&window_start);
    db.connection()
        .call(move |conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM processed_messages
                     WHERE conversation_id = ?1 AND text_hash = ?2 AND processed_at >= ?3
                 )",
                params![conversation_id, text_hash, cutoff],
                |row| row.get::<_, bool>(0),
            )?;
            Ok(exists)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically record a message unless an identical one already exists inside
/// the window. Returns `true` when the message is a duplicate (and nothing
/// was recorded).
///
/// The existence check, the insert, and the prune of out-of-window rows for
/// the conversation run in one transaction, closing the race between two
/// concurrent deliveries of the same text.
pub async fn check_and_record(
    db: &Database,
    record: &ProcessedMessage,
    window_start: DateTime<Utc>,
) -> Result<bool, DukkanError> {
    let conversation_id = record.conversation_id.0.clone();
    let text_hash = record.text_hash.clone();
    let raw_text = record.raw_text.clone();
    let processed_at = models::render_ts(&record.processed_at);
    let cutoff = models::render_ts(&window_start);

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let duplicate = tx.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM processed_messages
                     WHERE conversation_id = ?1 AND text_hash = ?2 AND processed_at >= ?3
                 )",
                params![conversation_id, text_hash, cutoff],
                |row| row.get::<_, bool>(0),
            )?;

            if duplicate {
                tx.commit()?;
                return Ok(true);
            }

            tx.execute(
                "INSERT INTO processed_messages (conversation_id, text_hash, raw_text, processed_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![conversation_id, text_hash, raw_text, processed_at],
            )?;
            tx.execute(
                "DELETE FROM processed_messages
                 WHERE conversation_id = ?1 AND processed_at < ?2",
                params![conversation_id, cutoff],
            )?;
            tx.commit()?;
            Ok(false)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
