#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::RowKey;

#[cfg(feature = "std")]
type Map<K> = HashMap<K, u32>;
#[cfg(not(feature = "std"))]
type Map<K> = BTreeMap<K, u32>;

/// The geometry cache: measured pixel height per item key.
///
/// Entries are written only by the measurement path and read by the range calculator; a
/// missing entry means the estimate function is authoritative until the item is measured.
/// The cache is scoped to one collection identity; `Virtualizer::replace_items` clears it.
#[derive(Clone, Debug, Default)]
pub struct HeightCache<K> {
    map: Map<K>,
}

impl<K: RowKey> HeightCache<K> {
    pub fn new() -> Self {
        Self { map: Map::new() }
    }

    pub fn get(&self, key: &K) -> Option<u32> {
        self.map.get(key).copied()
    }

    pub fn set(&mut self, key: K, height: u32) {
        self.map.insert(key, height);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u32)> {
        self.map.iter().map(|(k, v)| (k, *v))
    }
}
