// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending-selection session operations.
//!
//! One row per conversation. Expiry is lazy: expired rows are treated as
//! absent (and deleted) at read time; there is no background sweeper.

use chrono::{DateTime, Utc};
use dukkan_core::types::{ConversationId, PendingSelection};
use dukkan_core::DukkanError;
use rusqlite::params;

use crate::database::Database;
use crate::models;

/// Create or replace the pending selection for its conversation.
///
/// Replacement is the last-ambiguity-wins rule: a conversation can only ever
/// answer its newest prompt.
pub async fn upsert_selection(
    db: &Database,
    selection: &PendingSelection,
) -> Result<(), DukkanError> {
    let conversation_id = selection.conversation_id.0.clone();
    let kind = selection.kind.to_string();
    let candidates = serde_json::to_string(&selection.candidates)
        .map_err(|e| DukkanError::Internal(format!("serialize candidates: {e}")))?;
    let original_text = selection.original_text.clone();
    let context = serde_json::to_string(&selection.context)
        .map_err(|e| DukkanError::Internal(format!("serialize context: {e}")))?;
    let created_at = models::render_ts(&selection.created_at);
    let expires_at = models::render_ts(&selection.expires_at);

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO pending_selections
                 (conversation_id, kind, candidates, original_text, context, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    conversation_id,
                    kind,
                    candidates,
                    original_text,
                    context,
                    created_at,
                    expires_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch the live selection for a conversation without consuming it.
///
/// An expired row is deleted and reported as absent.
pub async fn peek_selection(
    db: &Database,
    conversation: &ConversationId,
    now: DateTime<Utc>,
) -> Result<Option<PendingSelection>, DukkanError> {
    let conversation_id = conversation.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT conversation_id, kind, candidates, original_text, context, created_at, expires_at
                 FROM pending_selections WHERE conversation_id = ?1",
            )?;
            let result = stmt.query_row(params![conversation_id], models::row_to_selection);
            match result {
                Ok(selection) => {
                    if selection.is_expired(now) {
                        conn.execute(
                            "DELETE FROM pending_selections WHERE conversation_id = ?1",
                            params![selection.conversation_id.0],
                        )?;
                        Ok(None)
                    } else {
                        Ok(Some(selection))
                    }
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically consume the live selection for a conversation.
///
/// Select and delete happen in one transaction on the single writer thread,
/// so of two racing consumers exactly one receives the selection; the other
/// observes absence.
pub async fn take_selection(
    db: &Database,
    conversation: &ConversationId,
    now: DateTime<Utc>,
) -> Result<Option<PendingSelection>, DukkanError> {
    let conversation_id = conversation.0.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let result = {
                let mut stmt = tx.prepare(
                    "SELECT conversation_id, kind, candidates, original_text, context, created_at, expires_at
                     FROM pending_selections WHERE conversation_id = ?1",
                )?;
                stmt.query_row(params![conversation_id], models::row_to_selection)
            };

            match result {
                Ok(selection) => {
                    tx.execute(
                        "DELETE FROM pending_selections WHERE conversation_id = ?1",
                        params![selection.conversation_id.0],
                    )?;
                    tx.commit()?;
                    if selection.is_expired(now) {
                        Ok(None)
                    } else {
                        Ok(Some(selection))
                    }
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    tx.commit()?;
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use dukkan_core::types::{CityId, SelectionCandidate, SelectionContext, SelectionKind};

    use super::*;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).await.unwrap();
        (dir, db)
    }

    fn selection(conversation: &str, expires_in: Duration) -> PendingSelection {
        let now = Utc::now();
        PendingSelection {
            conversation_id: ConversationId(conversation.to_string()),
            kind: SelectionKind::Region,
            candidates: vec![
                SelectionCandidate {
                    id: 10,
                    label: "غماس".into(),
                },
                SelectionCandidate {
                    id: 11,
                    label: "غماس الغربية".into(),
                },
            ],
            original_text: "احمد\n07701234567\nديوانية غماس\nقميص ازرق لارج".into(),
            context: SelectionContext::Region {
                city_id: CityId(3),
                city_name: "الديوانية".into(),
            },
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[tokio::test]
    async fn upsert_then_peek_round_trips() {
        let (_dir, db) = test_db().await;
        let sel = selection("c1", Duration::minutes(10));
        upsert_selection(&db, &sel).await.unwrap();

        let got = peek_selection(&db, &sel.conversation_id, Utc::now())
            .await
            .unwrap()
            .expect("selection should be live");
        assert_eq!(got.kind, SelectionKind::Region);
        assert_eq!(got.candidates, sel.candidates);
        assert_eq!(got.original_text, sel.original_text);
        assert_eq!(got.context, sel.context);
    }

    #[tokio::test]
    async fn peek_deletes_expired_rows() {
        let (_dir, db) = test_db().await;
        let sel = selection("c1", Duration::minutes(-1));
        upsert_selection(&db, &sel).await.unwrap();

        assert!(peek_selection(&db, &sel.conversation_id, Utc::now())
            .await
            .unwrap()
            .is_none());

        // The row itself is gone, not just filtered.
        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row(
                    "SELECT COUNT(*) FROM pending_selections",
                    [],
                    |row| row.get(0),
                )?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn take_consumes_exactly_once() {
        let (_dir, db) = test_db().await;
        let sel = selection("c1", Duration::minutes(10));
        upsert_selection(&db, &sel).await.unwrap();

        let first = take_selection(&db, &sel.conversation_id, Utc::now())
            .await
            .unwrap();
        assert!(first.is_some());

        let second = take_selection(&db, &sel.conversation_id, Utc::now())
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn take_of_expired_selection_yields_none_and_clears_the_row() {
        let (_dir, db) = test_db().await;
        let sel = selection("c1", Duration::minutes(-5));
        upsert_selection(&db, &sel).await.unwrap();

        assert!(take_selection(&db, &sel.conversation_id, Utc::now())
            .await
            .unwrap()
            .is_none());
        assert!(peek_selection(&db, &sel.conversation_id, Utc::now())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_the_previous_selection() {
        let (_dir, db) = test_db().await;
        let first = selection("c1", Duration::minutes(10));
        upsert_selection(&db, &first).await.unwrap();

        let mut second = selection("c1", Duration::minutes(10));
        second.kind = SelectionKind::Variant;
        second.candidates = vec![SelectionCandidate {
            id: 77,
            label: "برشلونة".into(),
        }];
        second.context = SelectionContext::Variant { line_index: 3 };
        upsert_selection(&db, &second).await.unwrap();

        let got = peek_selection(&db, &first.conversation_id, Utc::now())
            .await
            .unwrap()
            .expect("replacement should be live");
        assert_eq!(got.kind, SelectionKind::Variant);
        assert_eq!(got.candidates, second.candidates);
        assert_eq!(got.context, second.context);
    }

    #[tokio::test]
    async fn selections_are_scoped_per_conversation() {
        let (_dir, db) = test_db().await;
        let a = selection("c1", Duration::minutes(10));
        let b = selection("c2", Duration::minutes(10));
        upsert_selection(&db, &a).await.unwrap();
        upsert_selection(&db, &b).await.unwrap();

        take_selection(&db, &a.conversation_id, Utc::now())
            .await
            .unwrap()
            .expect("c1 selection live");
        peek_selection(&db, &b.conversation_id, Utc::now())
            .await
            .unwrap()
            .expect("c2 selection untouched");
    }
}
