use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    chat::{Chat, NotificationSettings},
    file::File,
    message::Message,
    user::User,
};

/// Outbound protocol request. The transport owns the wire encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    GetChat {
        chat_id: i64,
    },
    GetUser {
        user_id: i64,
    },
    GetChatHistory {
        chat_id: i64,
        from_message_id: i64,
        limit: usize,
    },
    SendMessage {
        chat_id: i64,
        reply_to_message_id: i64,
        text: String,
    },
    SetChatNotificationSettings {
        chat_id: i64,
        notification_settings: NotificationSettings,
    },
    DeleteChatHistory {
        chat_id: i64,
        remove_from_chat_list: bool,
    },
    LeaveChat {
        chat_id: i64,
    },
    ViewMessages {
        chat_id: i64,
        message_ids: Vec<i64>,
    },
    DownloadFile {
        file_id: i32,
        priority: i32,
    },
    CancelDownloadFile {
        file_id: i32,
    },
}

impl Request {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Request::GetChat { .. } => "get_chat",
            Request::GetUser { .. } => "get_user",
            Request::GetChatHistory { .. } => "get_chat_history",
            Request::SendMessage { .. } => "send_message",
            Request::SetChatNotificationSettings { .. } => "set_chat_notification_settings",
            Request::DeleteChatHistory { .. } => "delete_chat_history",
            Request::LeaveChat { .. } => "leave_chat",
            Request::ViewMessages { .. } => "view_messages",
            Request::DownloadFile { .. } => "download_file",
            Request::CancelDownloadFile { .. } => "cancel_download_file",
        }
    }
}

/// Successful protocol response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Ok,
    Chat { chat: Chat },
    User { user: User },
    Message { message: Message },
    Messages { messages: Vec<Message> },
    File { file: File },
}

/// Structured protocol-level failure, propagated to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("protocol error {code}: {message}")]
pub struct ProtocolError {
    pub code: i32,
    pub message: String,
}
