use std::{collections::HashMap, sync::Mutex};

use crate::domain::{
    chat::{Chat, DraftMessage, NotificationSettings},
    message::Message,
};

use super::{
    bus::{BusEvent, SubscriptionId},
    entity::EntityStore,
};

const PATCH_UNKNOWN_CHAT: &str = "CHAT_PATCH_UNKNOWN_CHAT";
const READ_OUTBOX_REGRESSION: &str = "CHAT_READ_OUTBOX_REGRESSION_IGNORED";

/// Minimal delta published after a chat mutation: the chat id plus the
/// fields that changed, never the full entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Loaded {
        chat_id: i64,
    },
    TitleChanged {
        chat_id: i64,
        title: String,
    },
    LastMessageChanged {
        chat_id: i64,
        last_message_id: Option<i64>,
    },
    ReadInbox {
        chat_id: i64,
        last_read_inbox_message_id: i64,
        unread_count: u32,
    },
    ReadOutbox {
        chat_id: i64,
        last_read_outbox_message_id: i64,
    },
    NotificationSettingsChanged {
        chat_id: i64,
        notification_settings: NotificationSettings,
    },
    PinnedChanged {
        chat_id: i64,
        is_pinned: bool,
    },
    DraftChanged {
        chat_id: i64,
        draft: Option<DraftMessage>,
    },
    OnlineMemberCountChanged {
        chat_id: i64,
        online_member_count: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEventKind {
    Loaded,
    TitleChanged,
    LastMessageChanged,
    ReadInbox,
    ReadOutbox,
    NotificationSettingsChanged,
    PinnedChanged,
    DraftChanged,
    OnlineMemberCountChanged,
}

impl BusEvent for ChatEvent {
    type Kind = ChatEventKind;

    fn kind(&self) -> ChatEventKind {
        match self {
            ChatEvent::Loaded { .. } => ChatEventKind::Loaded,
            ChatEvent::TitleChanged { .. } => ChatEventKind::TitleChanged,
            ChatEvent::LastMessageChanged { .. } => ChatEventKind::LastMessageChanged,
            ChatEvent::ReadInbox { .. } => ChatEventKind::ReadInbox,
            ChatEvent::ReadOutbox { .. } => ChatEventKind::ReadOutbox,
            ChatEvent::NotificationSettingsChanged { .. } => {
                ChatEventKind::NotificationSettingsChanged
            }
            ChatEvent::PinnedChanged { .. } => ChatEventKind::PinnedChanged,
            ChatEvent::DraftChanged { .. } => ChatEventKind::DraftChanged,
            ChatEvent::OnlineMemberCountChanged { .. } => ChatEventKind::OnlineMemberCountChanged,
        }
    }
}

/// Cache of chat snapshots plus the per-chat online member counter.
///
/// Patch-type updates for a chat id that has not been loaded are dropped
/// with a debug log: the server always announces a chat before patching it.
pub struct ChatStore {
    entries: EntityStore<i64, Chat, ChatEvent>,
    online_counts: Mutex<HashMap<i64, u32>>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self {
            entries: EntityStore::new(),
            online_counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, chat_id: i64) -> Option<Chat> {
        self.entries.get(&chat_id)
    }

    pub fn contains(&self, chat_id: i64) -> bool {
        self.entries.contains(&chat_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn online_member_count(&self, chat_id: i64) -> u32 {
        self.online_counts
            .lock()
            .map(|counts| counts.get(&chat_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn on(
        &self,
        kind: ChatEventKind,
        handler: impl Fn(&ChatEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.entries.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.entries.off(id)
    }

    pub fn clear_subscribers(&self) {
        self.entries.clear_subscribers()
    }

    pub(crate) fn put(&self, chat: Chat) {
        let chat_id = chat.id;
        self.entries.insert(chat_id, chat);
        self.entries.emit(&ChatEvent::Loaded { chat_id });
    }

    pub(crate) fn apply_title(&self, chat_id: i64, title: String) {
        let applied = self.entries.patch(&chat_id, |chat| {
            chat.title = title.clone();
        });

        match applied {
            Some(()) => self.entries.emit(&ChatEvent::TitleChanged { chat_id, title }),
            None => log_unknown_chat(chat_id, "chat_title"),
        }
    }

    pub(crate) fn apply_last_message(&self, chat_id: i64, last_message: Option<Message>) {
        let last_message_id = last_message.as_ref().map(|message| message.id);
        let applied = self.entries.patch(&chat_id, |chat| {
            chat.last_message = last_message;
        });

        match applied {
            Some(()) => self.entries.emit(&ChatEvent::LastMessageChanged {
                chat_id,
                last_message_id,
            }),
            None => log_unknown_chat(chat_id, "chat_last_message"),
        }
    }

    pub(crate) fn apply_read_inbox(
        &self,
        chat_id: i64,
        last_read_inbox_message_id: i64,
        unread_count: u32,
    ) {
        let applied = self.entries.patch(&chat_id, |chat| {
            chat.last_read_inbox_message_id = last_read_inbox_message_id;
            chat.unread_count = unread_count;
        });

        match applied {
            Some(()) => self.entries.emit(&ChatEvent::ReadInbox {
                chat_id,
                last_read_inbox_message_id,
                unread_count,
            }),
            None => log_unknown_chat(chat_id, "chat_read_inbox"),
        }
    }

    /// The outbox read position is monotonically non-decreasing; a patch
    /// below the current position is ignored and emits nothing.
    pub(crate) fn apply_read_outbox(&self, chat_id: i64, last_read_outbox_message_id: i64) {
        let applied = self.entries.patch(&chat_id, |chat| {
            if last_read_outbox_message_id < chat.last_read_outbox_message_id {
                return false;
            }
            chat.last_read_outbox_message_id = last_read_outbox_message_id;
            true
        });

        match applied {
            Some(true) => self.entries.emit(&ChatEvent::ReadOutbox {
                chat_id,
                last_read_outbox_message_id,
            }),
            Some(false) => tracing::debug!(
                code = READ_OUTBOX_REGRESSION,
                chat_id,
                last_read_outbox_message_id,
                "dropping read-outbox position below the current one"
            ),
            None => log_unknown_chat(chat_id, "chat_read_outbox"),
        }
    }

    pub(crate) fn apply_notification_settings(
        &self,
        chat_id: i64,
        notification_settings: NotificationSettings,
    ) {
        let applied = self.entries.patch(&chat_id, |chat| {
            chat.notification_settings = notification_settings;
        });

        match applied {
            Some(()) => self.entries.emit(&ChatEvent::NotificationSettingsChanged {
                chat_id,
                notification_settings,
            }),
            None => log_unknown_chat(chat_id, "chat_notification_settings"),
        }
    }

    pub(crate) fn apply_is_pinned(&self, chat_id: i64, is_pinned: bool) {
        let applied = self.entries.patch(&chat_id, |chat| {
            chat.is_pinned = is_pinned;
        });

        match applied {
            Some(()) => self
                .entries
                .emit(&ChatEvent::PinnedChanged { chat_id, is_pinned }),
            None => log_unknown_chat(chat_id, "chat_is_pinned"),
        }
    }

    pub(crate) fn apply_draft(&self, chat_id: i64, draft: Option<DraftMessage>) {
        let emitted = draft.clone();
        let applied = self.entries.patch(&chat_id, |chat| {
            chat.draft = draft;
        });

        match applied {
            Some(()) => self.entries.emit(&ChatEvent::DraftChanged {
                chat_id,
                draft: emitted,
            }),
            None => log_unknown_chat(chat_id, "chat_draft_message"),
        }
    }

    /// Online counts are tracked independently of chat snapshots; they can
    /// arrive before the chat itself is loaded.
    pub(crate) fn apply_online_member_count(&self, chat_id: i64, online_member_count: u32) {
        if let Ok(mut counts) = self.online_counts.lock() {
            counts.insert(chat_id, online_member_count);
        }
        self.entries.emit(&ChatEvent::OnlineMemberCountChanged {
            chat_id,
            online_member_count,
        });
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

fn log_unknown_chat(chat_id: i64, update_kind: &'static str) {
    tracing::debug!(
        code = PATCH_UNKNOWN_CHAT,
        chat_id,
        update_kind,
        "dropping patch for a chat that is not loaded"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::test_support::sample_private_chat;

    #[test]
    fn get_returns_none_for_unloaded_chat() {
        let store = ChatStore::new();

        assert_eq!(store.get(1), None);
    }

    #[test]
    fn put_then_get_returns_snapshot_and_emits_loaded() {
        let store = ChatStore::new();
        let loaded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&loaded);
        store.on(ChatEventKind::Loaded, move |event| {
            if let ChatEvent::Loaded { chat_id } = event {
                sink.lock().expect("sink lock").push(*chat_id);
            }
            Ok(())
        });

        store.put(sample_private_chat(42));

        assert_eq!(store.get(42).expect("chat must exist").id, 42);
        assert_eq!(*loaded.lock().expect("loaded lock"), vec![42]);
    }

    #[test]
    fn read_inbox_patch_changes_only_read_fields() {
        let store = ChatStore::new();
        let mut chat = sample_private_chat(1);
        chat.title = "untouched".to_owned();
        chat.unread_count = 5;
        store.put(chat.clone());

        store.apply_read_inbox(1, 90, 0);

        let after = store.get(1).expect("chat must exist");
        let mut expected = chat;
        expected.last_read_inbox_message_id = 90;
        expected.unread_count = 0;
        assert_eq!(after, expected);
    }

    #[test]
    fn read_outbox_position_is_monotonic() {
        let store = ChatStore::new();
        store.put(sample_private_chat(1));

        store.apply_read_outbox(1, 100);
        store.apply_read_outbox(1, 40);

        assert_eq!(
            store.get(1).expect("chat must exist").last_read_outbox_message_id,
            100
        );
    }

    #[test]
    fn ignored_outbox_regression_emits_no_event() {
        let store = ChatStore::new();
        store.put(sample_private_chat(1));
        store.apply_read_outbox(1, 100);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.on(ChatEventKind::ReadOutbox, move |event| {
            if let ChatEvent::ReadOutbox {
                last_read_outbox_message_id,
                ..
            } = event
            {
                sink.lock().expect("sink lock").push(*last_read_outbox_message_id);
            }
            Ok(())
        });

        store.apply_read_outbox(1, 40);
        store.apply_read_outbox(1, 120);

        assert_eq!(*seen.lock().expect("seen lock"), vec![120]);
    }

    #[test]
    fn patch_for_unknown_chat_is_dropped() {
        let store = ChatStore::new();

        store.apply_title(5, "ghost".to_owned());

        assert_eq!(store.get(5), None);
    }

    #[test]
    fn subscriber_sees_store_state_already_applied() {
        let store = Arc::new(ChatStore::new());
        store.put(sample_private_chat(1));

        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        let reader = Arc::clone(&store);
        store.on(ChatEventKind::TitleChanged, move |_| {
            let title = reader.get(1).map(|chat| chat.title);
            *sink.lock().expect("sink lock") = title;
            Ok(())
        });

        store.apply_title(1, "renamed".to_owned());

        assert_eq!(
            observed.lock().expect("observed lock").clone(),
            Some("renamed".to_owned())
        );
    }

    #[test]
    fn online_member_count_defaults_to_zero() {
        let store = ChatStore::new();

        assert_eq!(store.online_member_count(9), 0);

        store.apply_online_member_count(9, 4);

        assert_eq!(store.online_member_count(9), 4);
    }
}
