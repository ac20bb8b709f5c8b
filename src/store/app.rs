use std::{collections::HashSet, sync::Mutex};

use crate::domain::update::{AuthorizationState, ConnectionState};

use super::bus::{BusEvent, EventBus, SubscriptionId};

/// Session-level state: the open chat, connection/authorization phases, and
/// which destructive operations are inside their undo window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    OpenChatChanged {
        previous: Option<i64>,
        current: Option<i64>,
    },
    ConnectionChanged {
        state: ConnectionState,
    },
    AuthorizationChanged {
        state: AuthorizationState,
    },
    ClearHistoryStateChanged {
        chat_id: i64,
        in_progress: bool,
    },
    LeaveChatStateChanged {
        chat_id: i64,
        in_progress: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEventKind {
    OpenChatChanged,
    ConnectionChanged,
    AuthorizationChanged,
    ClearHistoryStateChanged,
    LeaveChatStateChanged,
}

impl BusEvent for AppEvent {
    type Kind = AppEventKind;

    fn kind(&self) -> AppEventKind {
        match self {
            AppEvent::OpenChatChanged { .. } => AppEventKind::OpenChatChanged,
            AppEvent::ConnectionChanged { .. } => AppEventKind::ConnectionChanged,
            AppEvent::AuthorizationChanged { .. } => AppEventKind::AuthorizationChanged,
            AppEvent::ClearHistoryStateChanged { .. } => AppEventKind::ClearHistoryStateChanged,
            AppEvent::LeaveChatStateChanged { .. } => AppEventKind::LeaveChatStateChanged,
        }
    }
}

#[derive(Debug)]
struct AppState {
    open_chat_id: Option<i64>,
    connection: ConnectionState,
    authorization: AuthorizationState,
    clearing_history: HashSet<i64>,
    leaving: HashSet<i64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            open_chat_id: None,
            connection: ConnectionState::Connecting,
            authorization: AuthorizationState::WaitParameters,
            clearing_history: HashSet::new(),
            leaving: HashSet::new(),
        }
    }
}

pub struct AppStore {
    state: Mutex<AppState>,
    bus: EventBus<AppEvent>,
}

impl AppStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AppState::default()),
            bus: EventBus::new(),
        }
    }

    pub fn open_chat_id(&self) -> Option<i64> {
        self.state.lock().map(|state| state.open_chat_id).unwrap_or(None)
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
            .lock()
            .map(|state| state.connection)
            .unwrap_or(ConnectionState::WaitingForNetwork)
    }

    pub fn authorization_state(&self) -> AuthorizationState {
        self.state
            .lock()
            .map(|state| state.authorization)
            .unwrap_or(AuthorizationState::Closed)
    }

    pub fn is_clearing_history(&self, chat_id: i64) -> bool {
        self.state
            .lock()
            .map(|state| state.clearing_history.contains(&chat_id))
            .unwrap_or(false)
    }

    pub fn is_leaving(&self, chat_id: i64) -> bool {
        self.state
            .lock()
            .map(|state| state.leaving.contains(&chat_id))
            .unwrap_or(false)
    }

    pub fn on(
        &self,
        kind: AppEventKind,
        handler: impl Fn(&AppEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.bus.off(id)
    }

    pub fn clear_subscribers(&self) {
        self.bus.clear()
    }

    pub(crate) fn set_open_chat(&self, chat_id: Option<i64>) {
        let previous = match self.state.lock() {
            Ok(mut state) => {
                if state.open_chat_id == chat_id {
                    return;
                }
                let previous = state.open_chat_id;
                state.open_chat_id = chat_id;
                previous
            }
            Err(_) => return,
        };

        self.bus.emit(&AppEvent::OpenChatChanged {
            previous,
            current: chat_id,
        });
    }

    pub(crate) fn set_connection_state(&self, connection: ConnectionState) {
        let changed = match self.state.lock() {
            Ok(mut state) => {
                let changed = state.connection != connection;
                state.connection = connection;
                changed
            }
            Err(_) => false,
        };

        if changed {
            self.bus
                .emit(&AppEvent::ConnectionChanged { state: connection });
        }
    }

    pub(crate) fn set_authorization_state(&self, authorization: AuthorizationState) {
        let changed = match self.state.lock() {
            Ok(mut state) => {
                let changed = state.authorization != authorization;
                state.authorization = authorization;
                changed
            }
            Err(_) => false,
        };

        if changed {
            self.bus.emit(&AppEvent::AuthorizationChanged {
                state: authorization,
            });
        }
    }

    pub(crate) fn set_clearing_history(&self, chat_id: i64, in_progress: bool) {
        let changed = match self.state.lock() {
            Ok(mut state) => {
                if in_progress {
                    state.clearing_history.insert(chat_id)
                } else {
                    state.clearing_history.remove(&chat_id)
                }
            }
            Err(_) => false,
        };

        if changed {
            self.bus.emit(&AppEvent::ClearHistoryStateChanged {
                chat_id,
                in_progress,
            });
        }
    }

    pub(crate) fn set_leaving(&self, chat_id: i64, in_progress: bool) {
        let changed = match self.state.lock() {
            Ok(mut state) => {
                if in_progress {
                    state.leaving.insert(chat_id)
                } else {
                    state.leaving.remove(&chat_id)
                }
            }
            Err(_) => false,
        };

        if changed {
            self.bus.emit(&AppEvent::LeaveChatStateChanged {
                chat_id,
                in_progress,
            });
        }
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn open_chat_change_carries_previous_and_current() {
        let store = AppStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.on(AppEventKind::OpenChatChanged, move |event| {
            if let AppEvent::OpenChatChanged { previous, current } = event {
                sink.lock().expect("sink lock").push((*previous, *current));
            }
            Ok(())
        });

        store.set_open_chat(Some(1));
        store.set_open_chat(Some(2));
        store.set_open_chat(None);

        assert_eq!(
            *seen.lock().expect("seen lock"),
            vec![(None, Some(1)), (Some(1), Some(2)), (Some(2), None)]
        );
    }

    #[test]
    fn reopening_the_same_chat_emits_nothing() {
        let store = AppStore::new();
        store.set_open_chat(Some(1));

        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        store.on(AppEventKind::OpenChatChanged, move |_| {
            *sink.lock().expect("sink lock") += 1;
            Ok(())
        });

        store.set_open_chat(Some(1));

        assert_eq!(*count.lock().expect("count lock"), 0);
    }

    #[test]
    fn clearing_history_flag_is_per_chat() {
        let store = AppStore::new();

        store.set_clearing_history(1, true);

        assert!(store.is_clearing_history(1));
        assert!(!store.is_clearing_history(2));

        store.set_clearing_history(1, false);

        assert!(!store.is_clearing_history(1));
    }

    #[test]
    fn lowering_an_unset_flag_emits_nothing() {
        let store = AppStore::new();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        store.on(AppEventKind::LeaveChatStateChanged, move |_| {
            *sink.lock().expect("sink lock") += 1;
            Ok(())
        });

        store.set_leaving(5, false);

        assert_eq!(*count.lock().expect("count lock"), 0);
    }

    #[test]
    fn connection_state_transitions_are_published_once() {
        let store = AppStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.on(AppEventKind::ConnectionChanged, move |event| {
            if let AppEvent::ConnectionChanged { state } = event {
                sink.lock().expect("sink lock").push(*state);
            }
            Ok(())
        });

        store.set_connection_state(ConnectionState::Updating);
        store.set_connection_state(ConnectionState::Updating);
        store.set_connection_state(ConnectionState::Ready);

        assert_eq!(
            *seen.lock().expect("seen lock"),
            vec![ConnectionState::Updating, ConnectionState::Ready]
        );
    }
}
