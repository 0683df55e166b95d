//! Durable map history with undo/redo
//!
//! The whole history lives in one record: a newest-first list of snapshots
//! and a pointer to the one currently shown. Saving prepends a snapshot and
//! drops everything newer than the pointer; undo and redo only move the
//! pointer. Every call reads the record, applies one transition, and writes
//! it back before returning.

use super::store::KeyValueStore;
use crate::error::{Error, Result};
use crate::map::{create_empty_map, validate_item, Item, MapData};
use log::{debug, warn};
use serde_json::Value;

/// Key of the history record.
pub const MAP_KEY: &str = "map";

/// Snapshots retained when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Where the history pointer sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStatus {
    /// Retained snapshots
    pub len: usize,
    /// Pointer, 0 is the newest snapshot
    pub index: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl HistoryStatus {
    fn of(data: &MapData) -> Self {
        let len = data.map_history.len();
        let index = data.current_map_index;
        Self {
            len,
            index,
            can_undo: index + 1 < len,
            can_redo: index > 0 && len > 0,
        }
    }
}

/// The sole reader and writer of the persisted map history.
pub struct MapRepository<S: KeyValueStore> {
    store: S,
    limit: usize,
}

impl<S: KeyValueStore> MapRepository<S> {
    /// Repository keeping [`DEFAULT_HISTORY_LIMIT`] snapshots.
    pub fn new(store: S) -> Self {
        Self::with_limit(store, DEFAULT_HISTORY_LIMIT)
    }

    /// Repository keeping at most `limit` snapshots (at least one).
    pub fn with_limit(store: S, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// The snapshot under the pointer, or a fresh empty map if none exists.
    pub fn get(&self) -> Result<Item> {
        Ok(self
            .load()?
            .and_then(|data| data.current().cloned())
            .unwrap_or_else(create_empty_map))
    }

    /// Record `tree` as the newest snapshot, discarding redoable states.
    pub fn save(&mut self, tree: Item) -> Result<()> {
        let data = self.load()?.unwrap_or_else(|| MapData {
            map_history: Vec::new(),
            current_map_index: 0,
        });

        let mut map_history = Vec::with_capacity(self.limit);
        map_history.push(tree);
        map_history.extend(
            data.map_history
                .into_iter()
                .skip(data.current_map_index)
                .take(self.limit - 1),
        );

        debug!("Saving snapshot ({} retained)", map_history.len());
        self.persist(&MapData {
            map_history,
            current_map_index: 0,
        })
    }

    /// Step back to the next older snapshot. Returns `false` at the oldest.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(mut data) = self.load()? else {
            return Ok(false);
        };
        if !HistoryStatus::of(&data).can_undo {
            return Ok(false);
        }
        data.current_map_index += 1;
        self.persist(&data)?;
        Ok(true)
    }

    /// Step forward to the next newer snapshot. Returns `false` at the newest.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(mut data) = self.load()? else {
            return Ok(false);
        };
        if !HistoryStatus::of(&data).can_redo {
            return Ok(false);
        }
        data.current_map_index -= 1;
        self.persist(&data)?;
        Ok(true)
    }

    /// Remove the whole history record.
    pub fn delete(&mut self) -> Result<()> {
        debug!("Deleting history record '{}'", MAP_KEY);
        self.store.remove(MAP_KEY)
    }

    /// Length and pointer position of the stored history.
    pub fn status(&self) -> Result<HistoryStatus> {
        Ok(self
            .load()?
            .map(|data| HistoryStatus::of(&data))
            .unwrap_or(HistoryStatus {
                len: 0,
                index: 0,
                can_undo: false,
                can_redo: false,
            }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Record Access
    // ─────────────────────────────────────────────────────────────────────────

    fn load(&self) -> Result<Option<MapData>> {
        let Some(raw) = self.store.get(MAP_KEY)? else {
            return Ok(None);
        };
        let mut data = decode_record(&raw)?;

        let len = data.map_history.len();
        if len > 0 && data.current_map_index >= len {
            warn!(
                "History pointer {} is out of range for {} snapshots, using the oldest",
                data.current_map_index, len
            );
            data.current_map_index = len - 1;
        } else if len == 0 {
            data.current_map_index = 0;
        }
        Ok(Some(data))
    }

    fn persist(&mut self, data: &MapData) -> Result<()> {
        let json = serde_json::to_string(data).map_err(|e| Error::StorageWrite {
            key: MAP_KEY.to_string(),
            source: Box::new(e),
        })?;
        self.store.set(MAP_KEY, &json)
    }
}

/// Decode a stored record: the history envelope, or a bare item tree
/// written before history existed.
fn decode_record(raw: &str) -> Result<MapData> {
    let corrupt = |message: String| Error::StorageCorrupt {
        key: MAP_KEY.to_string(),
        message,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;
    if value.get("mapHistory").is_some() {
        return serde_json::from_value(value).map_err(|e| corrupt(e.to_string()));
    }

    let item = validate_item(&value).map_err(|e| corrupt(e.to_string()))?;
    warn!("Upgrading single-map record '{}' to a history envelope", MAP_KEY);
    Ok(MapData::with_snapshot(item))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
