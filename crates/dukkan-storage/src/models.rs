// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between SQLite and the core domain types.
//!
//! Timestamps are stored as RFC 3339 UTC strings with millisecond precision
//! and a trailing `Z`. The width is fixed, so string comparison inside SQL
//! orders rows chronologically. All timestamps are rendered here, never by
//! SQL functions.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use dukkan_core::types::{
    ConversationId, PendingSelection, SelectionCandidate, SelectionContext, SelectionKind,
};

pub use dukkan_core::types::ProcessedMessage;

/// Render a timestamp in the canonical column format.
pub(crate) fn render_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp column back into a UTC instant.
pub(crate) fn parse_ts(column: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

/// Map a `pending_selections` row (all seven columns, in schema order) into
/// the domain type.
pub(crate) fn row_to_selection(row: &rusqlite::Row<'_>) -> Result<PendingSelection, rusqlite::Error> {
    let conversation_id: String = row.get(0)?;
    let kind_raw: String = row.get(1)?;
    let candidates_raw: String = row.get(2)?;
    let original_text: String = row.get(3)?;
    let context_raw: String = row.get(4)?;
    let created_raw: String = row.get(5)?;
    let expires_raw: String = row.get(6)?;

    let kind = SelectionKind::from_str(&kind_raw).map_err(|e| conversion_error(1, e))?;
    let candidates: Vec<SelectionCandidate> =
        serde_json::from_str(&candidates_raw).map_err(|e| conversion_error(2, e))?;
    let context: SelectionContext =
        serde_json::from_str(&context_raw).map_err(|e| conversion_error(4, e))?;

    Ok(PendingSelection {
        conversation_id: ConversationId(conversation_id),
        kind,
        candidates,
        original_text,
        context,
        created_at: parse_ts(5, &created_raw)?,
        expires_at: parse_ts(6, &expires_raw)?,
    })
}

fn conversion_error(
    column: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(e),
    )
}
