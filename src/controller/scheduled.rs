use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{runtime::Handle, sync::oneshot};

const ACTION_ALREADY_PENDING: &str = "ACTION_ALREADY_PENDING";
const ACTION_COMMIT_FAILED: &str = "ACTION_COMMIT_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ClearHistory,
    LeaveChat,
}

impl ActionKind {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::ClearHistory => "clear_history",
            Self::LeaveChat => "leave_chat",
        }
    }
}

/// Identity of a scheduled action: at most one pending entry per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub kind: ActionKind,
    pub chat_id: i64,
}

impl ActionKey {
    pub fn new(kind: ActionKind, chat_id: i64) -> Self {
        Self { kind, chat_id }
    }
}

pub type CommitFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
pub type CommitFn = Box<dyn FnOnce() -> CommitFuture + Send>;
pub type CancelFn = Box<dyn FnOnce() + Send>;

struct PendingAction {
    commit: CommitFn,
    cancel: CancelFn,
    // Dropping the sender wakes the timer task, which then finds the map
    // entry gone and exits without committing.
    _stop: oneshot::Sender<()>,
}

/// Deferred, undoable destructive operations: "do X in N seconds unless
/// undone".
///
/// Whoever removes the map entry owns the callbacks, so commit and cancel
/// are mutually exclusive by construction: the timer task removes the entry
/// on expiry and runs the commit; [`ScheduledActionRegistry::remove`]
/// removes it earlier and runs the cancel. Either way the entry is gone
/// before the callback runs, including when the commit fails.
pub struct ScheduledActionRegistry {
    pending: Arc<Mutex<HashMap<ActionKey, PendingAction>>>,
    runtime: Handle,
}

impl ScheduledActionRegistry {
    pub fn new(runtime: Handle) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            runtime,
        }
    }

    /// Starts the undo window for `key`. Returns false when an action with
    /// the same key is already pending; the existing timer is untouched.
    pub fn add(
        &self,
        key: ActionKey,
        delay: Duration,
        commit: CommitFn,
        cancel: CancelFn,
    ) -> bool {
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        {
            let Ok(mut pending) = self.pending.lock() else {
                return false;
            };
            if pending.contains_key(&key) {
                tracing::debug!(
                    code = ACTION_ALREADY_PENDING,
                    kind = key.kind.as_label(),
                    chat_id = key.chat_id,
                    "rejecting duplicate scheduled action"
                );
                return false;
            }
            pending.insert(
                key,
                PendingAction {
                    commit,
                    cancel,
                    _stop: stop_tx,
                },
            );
        }

        let pending = Arc::clone(&self.pending);
        self.runtime.spawn(async move {
            // `biased` checks cancellation first: a timer whose entry was
            // removed and rescheduled must never fire against the new entry.
            tokio::select! {
                biased;
                _ = stop_rx => {
                    // Cancelled; the remover already ran the cancel callback.
                }
                _ = tokio::time::sleep(delay) => {
                    let entry = pending.lock().ok().and_then(|mut map| map.remove(&key));
                    if let Some(entry) = entry {
                        if let Err(error) = (entry.commit)().await {
                            tracing::warn!(
                                code = ACTION_COMMIT_FAILED,
                                kind = key.kind.as_label(),
                                chat_id = key.chat_id,
                                error = ?error,
                                "scheduled action commit failed"
                            );
                        }
                    }
                }
            }
        });

        true
    }

    /// Cancels the pending action for `key`, if any: stops its timer and
    /// runs the cancel callback. Idempotent: calling it for an absent,
    /// already-committed, or already-cancelled key is a no-op.
    pub fn remove(&self, key: &ActionKey) {
        let entry = self.pending.lock().ok().and_then(|mut map| map.remove(key));
        if let Some(entry) = entry {
            (entry.cancel)();
        }
    }

    pub fn is_pending(&self, key: &ActionKey) -> bool {
        self.pending
            .lock()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Cancels everything still pending. Used at context teardown.
    pub fn clear(&self) {
        let entries: Vec<PendingAction> = match self.pending.lock() {
            Ok(mut map) => map.drain().map(|(_, entry)| entry).collect(),
            Err(_) => return,
        };

        for entry in entries {
            (entry.cancel)();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::sync::mpsc;

    use super::*;

    fn counting_commit(counter: &Arc<AtomicU32>, done: mpsc::UnboundedSender<()>) -> CommitFn {
        let counter = Arc::clone(counter);
        Box::new(move || {
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = done.send(());
                Ok(())
            })
        })
    }

    fn counting_cancel(counter: &Arc<AtomicU32>) -> CancelFn {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn noop_cancel() -> CancelFn {
        Box::new(|| {})
    }

    #[tokio::test(start_paused = true)]
    async fn commit_fires_after_the_delay_and_removes_the_entry() {
        let registry = ScheduledActionRegistry::new(Handle::current());
        let commits = Arc::new(AtomicU32::new(0));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let key = ActionKey::new(ActionKind::ClearHistory, 1);

        let accepted = registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&commits, done_tx),
            noop_cancel(),
        );
        assert!(accepted);
        assert!(registry.is_pending(&key));

        done_rx.recv().await.expect("commit must fire");

        assert_eq!(commits.load(Ordering::SeqCst), 1);
        assert!(!registry.is_pending(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_key_is_rejected_and_only_one_commit_fires() {
        let registry = ScheduledActionRegistry::new(Handle::current());
        let commits = Arc::new(AtomicU32::new(0));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let key = ActionKey::new(ActionKind::ClearHistory, 1);

        assert!(registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&commits, done_tx.clone()),
            noop_cancel(),
        ));
        assert!(!registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&commits, done_tx),
            noop_cancel(),
        ));

        done_rx.recv().await.expect("first commit must fire");
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(commits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_before_expiry_cancels_and_suppresses_the_commit() {
        let registry = ScheduledActionRegistry::new(Handle::current());
        let commits = Arc::new(AtomicU32::new(0));
        let cancels = Arc::new(AtomicU32::new(0));
        let (done_tx, _done_rx) = mpsc::unbounded_channel();
        let key = ActionKey::new(ActionKind::LeaveChat, 2);

        registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&commits, done_tx),
            counting_cancel(&cancels),
        );
        registry.remove(&key);

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert!(!registry.is_pending(&key));

        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_is_idempotent_in_every_phase() {
        let registry = ScheduledActionRegistry::new(Handle::current());
        let cancels = Arc::new(AtomicU32::new(0));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let key = ActionKey::new(ActionKind::ClearHistory, 3);

        // Never existed.
        registry.remove(&key);
        assert_eq!(cancels.load(Ordering::SeqCst), 0);

        // After cancellation.
        registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&Arc::new(AtomicU32::new(0)), done_tx.clone()),
            counting_cancel(&cancels),
        );
        registry.remove(&key);
        registry.remove(&key);
        assert_eq!(cancels.load(Ordering::SeqCst), 1);

        // After commit.
        registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&Arc::new(AtomicU32::new(0)), done_tx),
            counting_cancel(&cancels),
        );
        done_rx.recv().await.expect("commit must fire");
        registry.remove(&key);
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn key_can_be_rescheduled_after_cancellation() {
        let registry = ScheduledActionRegistry::new(Handle::current());
        let commits = Arc::new(AtomicU32::new(0));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let key = ActionKey::new(ActionKind::ClearHistory, 4);

        registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&commits, done_tx.clone()),
            noop_cancel(),
        );
        registry.remove(&key);

        assert!(registry.add(
            key,
            Duration::from_secs(5),
            counting_commit(&commits, done_tx),
            noop_cancel(),
        ));

        done_rx.recv().await.expect("second schedule must commit");
        assert_eq!(commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_commit_still_removes_the_entry() {
        let registry = ScheduledActionRegistry::new(Handle::current());
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let key = ActionKey::new(ActionKind::ClearHistory, 5);

        registry.add(
            key,
            Duration::from_secs(5),
            Box::new(move || {
                Box::pin(async move {
                    let _ = done_tx.send(());
                    Err(anyhow::anyhow!("server refused"))
                })
            }),
            noop_cancel(),
        );

        done_rx.recv().await.expect("commit must run");
        tokio::task::yield_now().await;

        assert!(!registry.is_pending(&key));

        // The key is free for a new schedule.
        assert!(registry.add(
            key,
            Duration::from_secs(5),
            Box::new(|| Box::pin(async { Ok(()) })),
            noop_cancel(),
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_every_pending_action() {
        let registry = ScheduledActionRegistry::new(Handle::current());
        let cancels = Arc::new(AtomicU32::new(0));
        let (done_tx, _done_rx) = mpsc::unbounded_channel();

        for chat_id in 1..=3 {
            registry.add(
                ActionKey::new(ActionKind::ClearHistory, chat_id),
                Duration::from_secs(5),
                counting_commit(&Arc::new(AtomicU32::new(0)), done_tx.clone()),
                counting_cancel(&cancels),
            );
        }

        registry.clear();

        assert_eq!(cancels.load(Ordering::SeqCst), 3);
        assert_eq!(registry.pending_count(), 0);
    }
}
