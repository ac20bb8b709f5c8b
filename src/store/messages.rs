use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Mutex,
};

use crate::domain::message::{Message, MessageContent};

use super::bus::{BusEvent, EventBus, SubscriptionId};

const PATCH_UNKNOWN_MESSAGE: &str = "MESSAGE_PATCH_UNKNOWN_MESSAGE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEvent {
    New {
        chat_id: i64,
        message_id: i64,
    },
    SendSucceeded {
        chat_id: i64,
        old_message_id: i64,
        message_id: i64,
    },
    ContentChanged {
        chat_id: i64,
        message_id: i64,
    },
    Edited {
        chat_id: i64,
        message_id: i64,
        edit_date: i64,
    },
    ViewsChanged {
        chat_id: i64,
        message_id: i64,
        views: i32,
    },
    Deleted {
        chat_id: i64,
        message_ids: Vec<i64>,
    },
    Selected {
        chat_id: i64,
        message_id: i64,
        selected: bool,
    },
    Highlighted {
        chat_id: i64,
        message_id: i64,
    },
    SelectionCleared {
        chat_id: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageEventKind {
    New,
    SendSucceeded,
    ContentChanged,
    Edited,
    ViewsChanged,
    Deleted,
    Selected,
    Highlighted,
    SelectionCleared,
}

impl BusEvent for MessageEvent {
    type Kind = MessageEventKind;

    fn kind(&self) -> MessageEventKind {
        match self {
            MessageEvent::New { .. } => MessageEventKind::New,
            MessageEvent::SendSucceeded { .. } => MessageEventKind::SendSucceeded,
            MessageEvent::ContentChanged { .. } => MessageEventKind::ContentChanged,
            MessageEvent::Edited { .. } => MessageEventKind::Edited,
            MessageEvent::ViewsChanged { .. } => MessageEventKind::ViewsChanged,
            MessageEvent::Deleted { .. } => MessageEventKind::Deleted,
            MessageEvent::Selected { .. } => MessageEventKind::Selected,
            MessageEvent::Highlighted { .. } => MessageEventKind::Highlighted,
            MessageEvent::SelectionCleared { .. } => MessageEventKind::SelectionCleared,
        }
    }
}

/// Message cache keyed by `(chat_id, message_id)`, kept ordered by id within
/// each chat (ids are assigned in arrival/send order). Also owns the local
/// selection and highlight state fed by client updates.
pub struct MessageStore {
    chats: Mutex<HashMap<i64, BTreeMap<i64, Message>>>,
    selected: Mutex<HashSet<(i64, i64)>>,
    highlighted: Mutex<Option<(i64, i64)>>,
    bus: EventBus<MessageEvent>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            chats: Mutex::new(HashMap::new()),
            selected: Mutex::new(HashSet::new()),
            highlighted: Mutex::new(None),
            bus: EventBus::new(),
        }
    }

    pub fn get(&self, chat_id: i64, message_id: i64) -> Option<Message> {
        self.chats
            .lock()
            .ok()
            .and_then(|chats| chats.get(&chat_id).and_then(|m| m.get(&message_id).cloned()))
    }

    /// Messages of a chat in ascending id order.
    pub fn history(&self, chat_id: i64) -> Vec<Message> {
        self.chats
            .lock()
            .map(|chats| {
                chats
                    .get(&chat_id)
                    .map(|messages| messages.values().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    pub fn count(&self, chat_id: i64) -> usize {
        self.chats
            .lock()
            .map(|chats| chats.get(&chat_id).map(BTreeMap::len).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn is_selected(&self, chat_id: i64, message_id: i64) -> bool {
        self.selected
            .lock()
            .map(|selected| selected.contains(&(chat_id, message_id)))
            .unwrap_or(false)
    }

    pub fn selected_messages(&self) -> Vec<(i64, i64)> {
        self.selected
            .lock()
            .map(|selected| {
                let mut items: Vec<_> = selected.iter().copied().collect();
                items.sort_unstable();
                items
            })
            .unwrap_or_default()
    }

    pub fn highlighted(&self) -> Option<(i64, i64)> {
        self.highlighted.lock().map(|h| *h).unwrap_or(None)
    }

    pub fn on(
        &self,
        kind: MessageEventKind,
        handler: impl Fn(&MessageEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.bus.off(id)
    }

    pub fn clear_subscribers(&self) {
        self.bus.clear()
    }

    pub(crate) fn put(&self, message: Message) {
        let (chat_id, message_id) = (message.chat_id, message.id);
        if let Ok(mut chats) = self.chats.lock() {
            chats.entry(chat_id).or_default().insert(message_id, message);
        }
        self.bus.emit(&MessageEvent::New {
            chat_id,
            message_id,
        });
    }

    /// Replaces the provisional entry created while the message was pending
    /// with the server-acknowledged one under its final id.
    pub(crate) fn apply_send_succeeded(&self, message: Message, old_message_id: i64) {
        let (chat_id, message_id) = (message.chat_id, message.id);
        if let Ok(mut chats) = self.chats.lock() {
            let messages = chats.entry(chat_id).or_default();
            messages.remove(&old_message_id);
            messages.insert(message_id, message);
        }
        self.bus.emit(&MessageEvent::SendSucceeded {
            chat_id,
            old_message_id,
            message_id,
        });
    }

    pub(crate) fn apply_content(&self, chat_id: i64, message_id: i64, new_content: MessageContent) {
        if self.patch(chat_id, message_id, |message| {
            message.content = new_content;
        }) {
            self.bus.emit(&MessageEvent::ContentChanged {
                chat_id,
                message_id,
            });
        } else {
            log_unknown_message(chat_id, message_id, "message_content");
        }
    }

    pub(crate) fn apply_edited(&self, chat_id: i64, message_id: i64, edit_date: i64) {
        if self.patch(chat_id, message_id, |message| {
            message.edit_date = edit_date;
        }) {
            self.bus.emit(&MessageEvent::Edited {
                chat_id,
                message_id,
                edit_date,
            });
        } else {
            log_unknown_message(chat_id, message_id, "message_edited");
        }
    }

    pub(crate) fn apply_views(&self, chat_id: i64, message_id: i64, views: i32) {
        if self.patch(chat_id, message_id, |message| {
            message.views = views;
        }) {
            self.bus.emit(&MessageEvent::ViewsChanged {
                chat_id,
                message_id,
                views,
            });
        } else {
            log_unknown_message(chat_id, message_id, "message_views");
        }
    }

    /// Removes the listed messages; the emitted delta carries only the ids
    /// that were actually present. Selection entries for removed messages
    /// are dropped as well.
    pub(crate) fn apply_delete(&self, chat_id: i64, message_ids: Vec<i64>) {
        let mut removed = Vec::new();
        if let Ok(mut chats) = self.chats.lock() {
            if let Some(messages) = chats.get_mut(&chat_id) {
                for message_id in message_ids {
                    if messages.remove(&message_id).is_some() {
                        removed.push(message_id);
                    }
                }
            }
        }

        if removed.is_empty() {
            return;
        }

        if let Ok(mut selected) = self.selected.lock() {
            for message_id in &removed {
                selected.remove(&(chat_id, *message_id));
            }
        }

        self.bus.emit(&MessageEvent::Deleted {
            chat_id,
            message_ids: removed,
        });
    }

    pub(crate) fn select(&self, chat_id: i64, message_id: i64, selected: bool) {
        let changed = match self.selected.lock() {
            Ok(mut set) => {
                if selected {
                    set.insert((chat_id, message_id))
                } else {
                    set.remove(&(chat_id, message_id))
                }
            }
            Err(_) => false,
        };

        if changed {
            self.bus.emit(&MessageEvent::Selected {
                chat_id,
                message_id,
                selected,
            });
        }
    }

    pub(crate) fn highlight(&self, chat_id: i64, message_id: i64) {
        if let Ok(mut highlighted) = self.highlighted.lock() {
            *highlighted = Some((chat_id, message_id));
        }
        self.bus.emit(&MessageEvent::Highlighted {
            chat_id,
            message_id,
        });
    }

    pub(crate) fn clear_selection(&self, chat_id: i64) {
        let had_any = match self.selected.lock() {
            Ok(mut selected) => {
                let before = selected.len();
                selected.retain(|(selected_chat, _)| *selected_chat != chat_id);
                before != selected.len()
            }
            Err(_) => false,
        };

        if had_any {
            self.bus.emit(&MessageEvent::SelectionCleared { chat_id });
        }
    }

    fn patch(&self, chat_id: i64, message_id: i64, apply: impl FnOnce(&mut Message)) -> bool {
        match self.chats.lock() {
            Ok(mut chats) => match chats.get_mut(&chat_id).and_then(|m| m.get_mut(&message_id)) {
                Some(message) => {
                    apply(message);
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

fn log_unknown_message(chat_id: i64, message_id: i64, update_kind: &'static str) {
    tracing::debug!(
        code = PATCH_UNKNOWN_MESSAGE,
        chat_id,
        message_id,
        update_kind,
        "dropping patch for a message that is not loaded"
    );
}
