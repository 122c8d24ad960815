// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use dukkan_config::StorageConfig;
use dukkan_core::DukkanError;
use tracing::debug;

/// Convert tokio_rusqlite errors into DukkanError::Storage.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> DukkanError {
    DukkanError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the single SQLite connection of the engine.
///
/// Query modules accept `&Database` and go through [`Database::connection`];
/// tokio-rusqlite serializes every closure on one background thread, which is
/// what makes the multi-step selection-take and duplicate-record operations
/// atomic.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if necessary) the database at the configured path,
    /// apply PRAGMAs, and run pending migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, DukkanError> {
        let path = config.database_path.clone();

        // Migrations run on a short-lived blocking connection before the
        // async connection opens.
        tokio::task::spawn_blocking(move || -> Result<(), DukkanError> {
            let mut conn = rusqlite::Connection::open(&path).map_err(|e| {
                DukkanError::Storage {
                    source: Box::new(e),
                }
            })?;
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| DukkanError::Internal(format!("migration task panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(&config.database_path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        let wal_mode = config.wal_mode;
        let busy_timeout_ms = config.busy_timeout_ms;
        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %config.database_path, wal = wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Open a database at an explicit path with default storage settings.
    ///
    /// Used by tests and embedding hosts that manage their own config.
    pub async fn open_at(path: &Path) -> Result<Self, DukkanError> {
        let config = StorageConfig {
            database_path: path.display().to_string(),
            ..StorageConfig::default()
        };
        Self::open(&config).await
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}
