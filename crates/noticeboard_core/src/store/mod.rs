//! Persistent slot store: named JSON blobs in SQLite.
//!
//! # Responsibility
//! - Open and configure the SQLite file backing the board.
//! - Expose string-keyed slot reads/writes behind a storage trait.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Slot values are complete JSON documents; partial writes never happen.
//! - Core code must not touch slot data before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod migrations;
mod open;
mod sqlite;

pub use memory::MemorySlotStore;
pub use open::{open_store, open_store_in_memory};
pub use sqlite::SqliteSlotStore;

/// Slot holding the serialized notice collection.
pub const SLOT_NOTICES: &str = "notices";
/// Slot holding the serialized favorite-id set.
pub const SLOT_FAVORITES: &str = "favorites";
/// Slot holding the logged-in identity, absent when logged out.
pub const SLOT_LOGGED_IN_USER: &str = "loggedInUser";
/// Slot holding the `"light"`/`"dark"` theme choice.
pub const SLOT_THEME: &str = "theme";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error for slot persistence.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    UninitializedStore {
        expected_version: u32,
        actual_version: u32,
    },
    MissingSlotsTable,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::UninitializedStore {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store schema version is {actual_version}, expected {expected_version}; \
                 open the store via open_store"
            ),
            Self::MissingSlotsTable => write!(f, "store is missing the `slots` table"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Storage seam for named slots.
///
/// The board core is written against this trait so tests and the degraded
/// "store unavailable" mode can run on [`MemorySlotStore`].
pub trait SlotStore {
    /// Reads one slot. `Ok(None)` when the slot was never written.
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>>;
    /// Writes one slot, replacing any previous value.
    fn write_slot(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes one slot. Clearing an absent slot is a no-op.
    fn clear_slot(&mut self, key: &str) -> StoreResult<()>;
}
