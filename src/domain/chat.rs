use serde::{Deserialize, Serialize};

use super::message::Message;

/// Kind of chat, carrying the id of the owning peer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatType {
    Private { user_id: i64 },
    Secret { user_id: i64 },
    BasicGroup { basic_group_id: i64 },
    Supergroup { supergroup_id: i64 },
}

impl ChatType {
    /// Private and secret chats are 1-to-1 conversations with a user.
    pub fn is_private(&self) -> bool {
        matches!(self, ChatType::Private { .. } | ChatType::Secret { .. })
    }
}

/// Per-chat notification settings. `mute_for` is a duration in seconds;
/// `use_default_mute_for` defers to the scope-wide default instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub use_default_mute_for: bool,
    pub mute_for: i32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            use_default_mute_for: true,
            mute_for: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftMessage {
    pub reply_to_message_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub title: String,
    pub chat_type: ChatType,
    pub last_message: Option<Message>,
    pub last_read_inbox_message_id: i64,
    pub last_read_outbox_message_id: i64,
    pub unread_count: u32,
    pub is_pinned: bool,
    pub notification_settings: NotificationSettings,
    pub draft: Option<DraftMessage>,
}
