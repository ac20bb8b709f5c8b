use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

const HANDLER_FAILED: &str = "STORE_HANDLER_FAILED";

/// Event published by a store. `Kind` is the subscription topic: consumers
/// subscribe to one kind and never see events of another.
pub trait BusEvent {
    type Kind: Copy + Eq + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// Token returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = dyn Fn(&E) -> anyhow::Result<()> + Send + Sync;

struct Entry<E: BusEvent> {
    id: SubscriptionId,
    kind: E::Kind,
    active: AtomicBool,
    handler: Box<Handler<E>>,
}

/// Per-store publish/subscribe with synchronous, in-registration-order
/// delivery. A failing handler is logged and skipped; delivery to the
/// remaining handlers continues. No lock is held while handlers run, so a
/// handler may freely subscribe, unsubscribe, or read stores.
pub struct EventBus<E: BusEvent> {
    entries: Mutex<Vec<Arc<Entry<E>>>>,
    next_id: AtomicU64,
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn on(
        &self,
        kind: E::Kind,
        handler: impl Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = Arc::new(Entry {
            id,
            kind,
            active: AtomicBool::new(true),
            handler: Box::new(handler),
        });

        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }

        id
    }

    /// Idempotent: unknown ids are a no-op. A handler removed mid-emit is
    /// not invoked for the remainder of that emit.
    pub fn off(&self, id: SubscriptionId) {
        if let Ok(mut entries) = self.entries.lock() {
            for entry in entries.iter() {
                if entry.id == id {
                    entry.active.store(false, Ordering::Release);
                }
            }
            entries.retain(|entry| entry.id != id);
        }
    }

    pub fn emit(&self, event: &E) {
        let targets: Vec<Arc<Entry<E>>> = match self.entries.lock() {
            Ok(entries) => entries
                .iter()
                .filter(|entry| entry.kind == event.kind())
                .cloned()
                .collect(),
            Err(_) => return,
        };

        for entry in targets {
            if !entry.active.load(Ordering::Acquire) {
                continue;
            }

            if let Err(error) = (entry.handler)(event) {
                tracing::warn!(
                    code = HANDLER_FAILED,
                    subscription = entry.id.0,
                    kind = ?event.kind(),
                    error = ?error,
                    "event handler failed; continuing delivery"
                );
            }
        }
    }

    /// Drops every subscription. Used at context teardown.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            for entry in entries.iter() {
                entry.active.store(false, Ordering::Release);
            }
            entries.clear();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
