// SQLite key-value store with per-entry expiry.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed string store. Every entry carries an absolute expiry; reads
/// treat expired entries as missing.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
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
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

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

    /// Store `value` under `key`, expiring `ttl` from now. Overwrites any
    /// previous entry and its expiry.
    pub fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.put_at(key, value, Utc::now() + ttl)
    }

    /// Store `value` under `key` with an explicit expiry instant.
    pub fn put_at(&self, key: &str, value: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, expires_at) VALUES (?1, ?2, ?3)",
            params![key, value, timestamp(expires_at)],
        )
        .context("failed to write kv entry")?;
        Ok(())
    }

    /// Read the live value under `key`. Returns `None` if the key is missing
    /// or expired; an expired row is deleted on the way out.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_at(key, Utc::now())
    }

    /// [`Database::get`] evaluated at the instant `now`.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let conn = self.conn();
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT value, expires_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("failed to query kv entry")?;

        let Some((value, expires_at)) = row else {
            return Ok(None);
        };

        // Unparseable expiry counts as expired.
        let live = DateTime::parse_from_rfc3339(&expires_at)
            .map(|t| t.with_timezone(&Utc) > now)
            .unwrap_or(false);
        if live {
            return Ok(Some(value));
        }

        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .context("failed to delete expired kv entry")?;
        Ok(None)
    }

    /// Delete every entry that expired before `now`. Returns the number of
    /// rows removed.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let conn = self.conn();
        // Fixed-width UTC timestamps compare chronologically as strings.
        let removed = conn
            .execute(
                "DELETE FROM kv_store WHERE expires_at <= ?1",
                params![timestamp(now)],
            )
            .context("failed to purge expired kv entries")?;
        Ok(removed)
    }

    /// [`Database::purge_expired_at`] evaluated now.
    pub fn purge_expired(&self) -> Result<usize> {
        self.purge_expired_at(Utc::now())
    }
}

/// Fixed-width RFC 3339 UTC form used for `expires_at`.
fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}
