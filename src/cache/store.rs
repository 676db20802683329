//! Bounded first-in-first-out storage.

use std::collections::VecDeque;

use super::CacheKey;
use crate::value::Value;

#[cfg(feature = "fxhash")]
type KeyMap = rustc_hash::FxHashMap<CacheKey, Value>;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type KeyMap = ahash::AHashMap<CacheKey, Value>;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type KeyMap = std::collections::HashMap<CacheKey, Value>;

/// At most `capacity` entries; inserting past capacity evicts the entry
/// inserted first. Lookups never change the eviction order.
#[derive(Debug)]
pub(crate) struct FifoStore {
    capacity: usize,
    entries: KeyMap,
    order: VecDeque<CacheKey>,
}

impl FifoStore {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: KeyMap::default(),
            order: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    pub(crate) fn get(&self, key: &CacheKey) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    /// Stores `value`, returning the evicted key if the store overflowed.
    ///
    /// Re-inserting a present key replaces its value but keeps its place in
    /// the queue.
    pub(crate) fn insert(&mut self, key: CacheKey, value: Value) -> Option<CacheKey> {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
        if self.order.len() <= self.capacity {
            return None;
        }
        let evicted = self.order.pop_front()?;
        self.entries.remove(&evicted);
        Some(evicted)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}
