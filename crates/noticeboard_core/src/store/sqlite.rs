//! SQLite-backed slot store.
//!
//! # Responsibility
//! - Implement [`SlotStore`] over the migrated `slots` table.
//! - Reject connections that were not opened via the bootstrap path.

use super::migrations::{current_user_version, latest_version};
use super::{SlotStore, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot store over an owned, migrated SQLite connection.
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Wraps a migrated connection after verifying store readiness.
    ///
    /// # Errors
    /// - [`StoreError::UninitializedStore`] when the schema version does not
    ///   match this binary's latest migration.
    /// - [`StoreError::MissingSlotsTable`] when the `slots` table is absent.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(&conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedStore {
                expected_version,
                actual_version,
            });
        }

        let has_table: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'slots';",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_table.is_none() {
            return Err(StoreError::MissingSlotsTable);
        }

        Ok(Self { conn })
    }
}

impl SlotStore for SqliteSlotStore {
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, written_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                written_at = excluded.written_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn clear_slot(&mut self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}
