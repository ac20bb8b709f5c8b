use serde::{Deserialize, Serialize};

use super::{
    chat::{Chat, DraftMessage, NotificationSettings},
    file::File,
    group::{BasicGroup, Supergroup},
    message::{Message, MessageContent},
    user::{User, UserStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConnectionState {
    WaitingForNetwork,
    Connecting,
    Updating,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthorizationState {
    WaitParameters,
    WaitPhoneNumber,
    WaitCode,
    WaitPassword,
    Ready,
    LoggingOut,
    Closed,
}

/// Server-origin state change pushed by the transport. Each variant is owned
/// by exactly one store; `Unknown` absorbs kinds this client does not model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Update {
    NewMessage {
        message: Message,
    },
    MessageSendSucceeded {
        message: Message,
        old_message_id: i64,
    },
    MessageContent {
        chat_id: i64,
        message_id: i64,
        new_content: MessageContent,
    },
    MessageEdited {
        chat_id: i64,
        message_id: i64,
        edit_date: i64,
    },
    MessageViews {
        chat_id: i64,
        message_id: i64,
        views: i32,
    },
    DeleteMessages {
        chat_id: i64,
        message_ids: Vec<i64>,
    },
    NewChat {
        chat: Chat,
    },
    ChatTitle {
        chat_id: i64,
        title: String,
    },
    ChatLastMessage {
        chat_id: i64,
        last_message: Option<Message>,
    },
    ChatReadInbox {
        chat_id: i64,
        last_read_inbox_message_id: i64,
        unread_count: u32,
    },
    ChatReadOutbox {
        chat_id: i64,
        last_read_outbox_message_id: i64,
    },
    ChatNotificationSettings {
        chat_id: i64,
        notification_settings: NotificationSettings,
    },
    ChatIsPinned {
        chat_id: i64,
        is_pinned: bool,
    },
    ChatDraftMessage {
        chat_id: i64,
        draft: Option<DraftMessage>,
    },
    ChatOnlineMemberCount {
        chat_id: i64,
        online_member_count: u32,
    },
    User {
        user: User,
    },
    UserStatus {
        user_id: i64,
        status: UserStatus,
    },
    Supergroup {
        supergroup: Supergroup,
    },
    BasicGroup {
        basic_group: BasicGroup,
    },
    File {
        file: File,
    },
    ConnectionState {
        state: ConnectionState,
    },
    AuthorizationState {
        state: AuthorizationState,
    },
    Unknown {
        kind: String,
    },
}

impl Update {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Update::NewMessage { .. } => "new_message",
            Update::MessageSendSucceeded { .. } => "message_send_succeeded",
            Update::MessageContent { .. } => "message_content",
            Update::MessageEdited { .. } => "message_edited",
            Update::MessageViews { .. } => "message_views",
            Update::DeleteMessages { .. } => "delete_messages",
            Update::NewChat { .. } => "new_chat",
            Update::ChatTitle { .. } => "chat_title",
            Update::ChatLastMessage { .. } => "chat_last_message",
            Update::ChatReadInbox { .. } => "chat_read_inbox",
            Update::ChatReadOutbox { .. } => "chat_read_outbox",
            Update::ChatNotificationSettings { .. } => "chat_notification_settings",
            Update::ChatIsPinned { .. } => "chat_is_pinned",
            Update::ChatDraftMessage { .. } => "chat_draft_message",
            Update::ChatOnlineMemberCount { .. } => "chat_online_member_count",
            Update::User { .. } => "user",
            Update::UserStatus { .. } => "user_status",
            Update::Supergroup { .. } => "supergroup",
            Update::BasicGroup { .. } => "basic_group",
            Update::File { .. } => "file",
            Update::ConnectionState { .. } => "connection_state",
            Update::AuthorizationState { .. } => "authorization_state",
            Update::Unknown { .. } => "unknown",
        }
    }
}

/// Locally synthesized update. Flows through the same dispatch path as
/// server updates so consumers have a single subscription model for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientUpdate {
    OpenChat {
        chat_id: Option<i64>,
    },
    ClearHistory {
        chat_id: i64,
        in_progress: bool,
    },
    LeaveChat {
        chat_id: i64,
        in_progress: bool,
    },
    MessageSelected {
        chat_id: i64,
        message_id: i64,
        selected: bool,
    },
    MessageHighlighted {
        chat_id: i64,
        message_id: i64,
    },
    ClearSelection {
        chat_id: i64,
    },
}

impl ClientUpdate {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ClientUpdate::OpenChat { .. } => "open_chat",
            ClientUpdate::ClearHistory { .. } => "clear_history",
            ClientUpdate::LeaveChat { .. } => "leave_chat",
            ClientUpdate::MessageSelected { .. } => "message_selected",
            ClientUpdate::MessageHighlighted { .. } => "message_highlighted",
            ClientUpdate::ClearSelection { .. } => "clear_selection",
        }
    }
}
