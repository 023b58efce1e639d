//! In-memory slot store for tests and degraded operation.

use super::{SlotStore, StoreResult};
use std::collections::HashMap;

/// Slot store over a plain map. Contents die with the process.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: HashMap<String, String>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear_slot(&mut self, key: &str) -> StoreResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}
