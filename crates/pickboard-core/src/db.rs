// SQLite persistence layer: the best-effort local cache for draft sessions.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One recorded status transition for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub player_id: String,
    pub player_name: String,
    pub from_status: String,
    pub to_status: String,
    /// UTC timestamp assigned by SQLite on insert. `None` before persisting.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// SQLite-backed cache holding the latest session snapshot (as JSON in a
/// key-value table) and a log of status transitions per session.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS status_log (
                seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id  TEXT NOT NULL,
                player_id   TEXT NOT NULL,
                player_name TEXT NOT NULL,
                from_status TEXT NOT NULL,
                to_status   TEXT NOT NULL,
                timestamp   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_status_log_session ON status_log(session_id);
            ",
        )
        .context("failed to create database schema")?;

        info!("Database opened at {}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Append a status transition to the log for `session_id`.
    pub fn record_status_change(&self, change: &StatusChange, session_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO status_log (session_id, player_id, player_name, from_status, to_status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id,
                change.player_id,
                change.player_name,
                change.from_status,
                change.to_status,
            ],
        )
        .context("failed to record status change")?;
        Ok(())
    }

    /// Load the status log for a session, oldest first.
    pub fn load_status_log(&self, session_id: &str) -> Result<Vec<StatusChange>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT player_id, player_name, from_status, to_status, timestamp
                 FROM status_log WHERE session_id = ?1 ORDER BY seq",
            )
            .context("failed to prepare load_status_log query")?;

        let changes = stmt
            .query_map(params![session_id], |row| {
                Ok(StatusChange {
                    player_id: row.get(0)?,
                    player_name: row.get(1)?,
                    from_status: row.get(2)?,
                    to_status: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })
            .context("failed to query status log")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map status log rows")?;

        Ok(changes)
    }

    /// Number of status transitions recorded for `session_id`.
    pub fn status_change_count(&self, session_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM status_log WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .context("failed to count status changes")?;
        Ok(count as usize)
    }

    /// Delete the status log and all cached state. Uses a transaction with
    /// automatic rollback on error.
    pub fn clear_all(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM status_log", [])
            .context("failed to delete status log")?;
        tx.execute("DELETE FROM draft_state", [])
            .context("failed to delete draft state")?;
        tx.commit().context("failed to commit clear_all")?;
        debug!("Cleared draft state and status log");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Session ID management
    // ------------------------------------------------------------------

    /// Key used in the draft_state table to store the current session ID.
    const SESSION_ID_KEY: &'static str = "current_session_id";

    /// Retrieve the stored session ID. Returns `None` if none has been set.
    pub fn get_session_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::SESSION_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    /// Persist a session ID to the key-value store.
    pub fn set_session_id(&self, session_id: &str) -> Result<()> {
        self.save_state(
            Self::SESSION_ID_KEY,
            &serde_json::Value::String(session_id.to_string()),
        )
    }

    /// Generate a new session ID from the current UTC timestamp.
    ///
    /// Format: `session_YYYYMMDD_HHMMSS_SSS` (e.g. `session_20260828_193011_042`).
    pub fn generate_session_id() -> String {
        let now = chrono::Utc::now();
        now.format("session_%Y%m%d_%H%M%S_%3f").to_string()
    }
}
