use std::{
    collections::HashMap,
    hash::Hash,
    sync::Mutex,
};

use super::bus::{BusEvent, EventBus, SubscriptionId};

/// Generic keyed entity cache shared by the scalar-keyed stores.
///
/// Reads return cloned snapshots; absence means "not yet loaded", never an
/// error. Mutation happens under the map lock, but events are emitted after
/// the lock is released so handlers observe the fully applied state and may
/// read the store without deadlocking.
pub struct EntityStore<K, V, E: BusEvent> {
    entries: Mutex<HashMap<K, V>>,
    bus: EventBus<E>,
}

impl<K, V, E> EntityStore<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: BusEvent,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            bus: EventBus::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&self, key: K, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, value);
        }
    }

    /// Applies a shallow patch to an existing entry. Returns the closure's
    /// result, or None when the key is absent (the patch is dropped).
    pub(crate) fn patch<T>(&self, key: &K, apply: impl FnOnce(&mut V) -> T) -> Option<T> {
        match self.entries.lock() {
            Ok(mut entries) => entries.get_mut(key).map(apply),
            Err(_) => None,
        }
    }

    pub(crate) fn remove(&self, key: &K) -> Option<V> {
        self.entries
            .lock()
            .ok()
            .and_then(|mut entries| entries.remove(key))
    }

    pub fn on(
        &self,
        kind: E::Kind,
        handler: impl Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.bus.off(id)
    }

    pub(crate) fn emit(&self, event: &E) {
        self.bus.emit(event)
    }

    pub fn clear_subscribers(&self) {
        self.bus.clear()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }
}

impl<K, V, E> Default for EntityStore<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: BusEvent,
{
    fn default() -> Self {
        Self::new()
    }
}
