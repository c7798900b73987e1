//! In-process store with multi-context change tracking.

use super::{KvStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct SharedState {
    entries: BTreeMap<String, String>,
    /// Per-context flag: set when another context wrote since the last check.
    pending: BTreeMap<u64, bool>,
    next_context: u64,
}

impl SharedState {
    fn register_context(&mut self) -> u64 {
        let context = self.next_context;
        self.next_context += 1;
        self.pending.insert(context, false);
        context
    }

    fn flag_others(&mut self, writer: u64) {
        for (context, pending) in self.pending.iter_mut() {
            if *context != writer {
                *pending = true;
            }
        }
    }
}

/// Map-backed store. Each value returned by [`MemoryStore::connect`] is a
/// separate context over the same entries, like two sessions sharing one
/// browser profile.
#[derive(Debug)]
pub struct MemoryStore {
    shared: Arc<Mutex<SharedState>>,
    context: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut state = SharedState::default();
        let context = state.register_context();
        Self {
            shared: Arc::new(Mutex::new(state)),
            context,
        }
    }

    /// Opens another context over the same entries.
    pub fn connect(&self) -> StoreResult<Self> {
        let context = self.lock()?.register_context();
        Ok(Self {
            shared: Arc::clone(&self.shared),
            context,
        })
    }

    /// Snapshot of every key currently stored, sorted.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock()?.entries.keys().cloned().collect())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, SharedState>> {
        self.shared
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        if let Ok(mut state) = self.shared.lock() {
            state.pending.remove(&self.context);
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.entries.insert(key.to_string(), value.to_string());
        state.flag_others(self.context);
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut state = self.lock()?;
        if state.entries.remove(key).is_some() {
            state.flag_others(self.context);
        }
        Ok(())
    }

    fn take_external_change(&self) -> StoreResult<bool> {
        let mut state = self.lock()?;
        Ok(state
            .pending
            .get_mut(&self.context)
            .map(std::mem::take)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::KvStore;

    #[test]
    fn own_writes_are_not_external() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert!(!store.take_external_change().unwrap());
    }

    #[test]
    fn dropped_context_stops_tracking() {
        let store = MemoryStore::new();
        let other = store.connect().unwrap();
        drop(other);
        store.set("a", "1").unwrap();
        assert_eq!(store.shared.lock().unwrap().pending.len(), 1);
    }
}
