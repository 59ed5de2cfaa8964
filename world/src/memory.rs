//! Durable per-room memory that outlives individual ticks.

use std::collections::BTreeMap;

use cost_matrix_core::{CacheEntry, CacheStore, RoomName, Tick};
use serde::{Deserialize, Serialize};

/// Cost matrices cached for a single room, keyed by canonical layer key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostMatrixMemory {
    entries: BTreeMap<String, CacheEntry>,
}

impl CostMatrixMemory {
    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the memory holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over cached entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }
}

impl CacheStore for CostMatrixMemory {
    fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: String, entry: CacheEntry) {
        if let Some(previous) = self.entries.insert(key, entry) {
            tracing::warn!(
                tick = %previous.tick,
                "overwrote an existing cost matrix entry"
            );
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}

/// Persistable copy of the world's durable memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Tick the world had reached when the snapshot was taken.
    pub tick: Tick,
    /// Cached cost matrices of every room.
    #[serde(default)]
    pub rooms: BTreeMap<RoomName, CostMatrixMemory>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cost_matrix_core::{CostGrid, DEFAULT_CACHE_KEY};

    #[test]
    fn snapshot_layout_maps_room_to_key_to_entry() {
        let mut memory = CostMatrixMemory::default();
        memory.insert(
            DEFAULT_CACHE_KEY.to_owned(),
            CacheEntry {
                matrix: CostGrid::new().to_serialized(),
                tick: Tick::new(3),
            },
        );
        let mut rooms = BTreeMap::new();
        let _ = rooms.insert(RoomName::new("W1N1"), memory);
        let snapshot = MemorySnapshot {
            tick: Tick::new(3),
            rooms,
        };

        let json = serde_json::to_value(&snapshot).expect("serialize snapshot");
        let matrix = &json["rooms"]["W1N1"][DEFAULT_CACHE_KEY]["matrix"];
        assert_eq!(matrix.as_array().map(Vec::len), Some(2500));
        assert_eq!(json["rooms"]["W1N1"][DEFAULT_CACHE_KEY]["tick"], 3);

        let restored: MemorySnapshot = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn snapshot_without_rooms_deserializes_empty() {
        let restored: MemorySnapshot =
            serde_json::from_str(r#"{ "tick": 12 }"#).expect("deserialize");
        assert_eq!(restored.tick, Tick::new(12));
        assert!(restored.rooms.is_empty());
    }
}
