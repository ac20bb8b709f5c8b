use serde::{Deserialize, Serialize};

/// Author of a message: a user, or a chat when posting as a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageSender {
    User { user_id: i64 },
    Chat { chat_id: i64 },
}

/// Origin of a forwarded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForwardOrigin {
    User { user_id: i64 },
    HiddenUser { sender_name: String },
    Channel { chat_id: i64, author_signature: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardInfo {
    pub origin: ForwardOrigin,
    pub date: i64,
}

/// Service actions rendered inline in the history instead of as content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServiceAction {
    GroupCreated { title: String },
    MemberJoined { user_id: i64 },
    MemberLeft { user_id: i64 },
    TitleChanged { title: String },
    PinnedMessage { message_id: i64 },
    Other { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageContent {
    Text { text: String },
    Photo { caption: String, file_id: i32 },
    Video { caption: String, file_id: i32 },
    Document { file_name: String, file_id: i32 },
    Sticker { emoji: String, file_id: i32 },
    Service { action: ServiceAction },
    Other { kind: String },
}

impl MessageContent {
    /// Returns a short bracketed label for non-text content, or None for text
    /// and service entries.
    pub fn brief_label(&self) -> Option<&'static str> {
        match self {
            MessageContent::Text { .. } | MessageContent::Service { .. } => None,
            MessageContent::Photo { .. } => Some("[Photo]"),
            MessageContent::Video { .. } => Some("[Video]"),
            MessageContent::Document { .. } => Some("[Document]"),
            MessageContent::Sticker { .. } => Some("[Sticker]"),
            MessageContent::Other { .. } => Some("[Media]"),
        }
    }

    /// Caption attached to media content, if any.
    pub fn caption(&self) -> Option<&str> {
        match self {
            MessageContent::Photo { caption, .. } | MessageContent::Video { caption, .. } => {
                Some(caption.as_str())
            }
            _ => None,
        }
    }

    /// The file referenced by media content, used to track transfer progress.
    pub fn file_id(&self) -> Option<i32> {
        match self {
            MessageContent::Photo { file_id, .. }
            | MessageContent::Video { file_id, .. }
            | MessageContent::Document { file_id, .. }
            | MessageContent::Sticker { file_id, .. } => Some(*file_id),
            _ => None,
        }
    }
}

/// Local delivery state of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SendingState {
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub sender: MessageSender,
    pub content: MessageContent,
    pub is_outgoing: bool,
    pub date: i64,
    pub edit_date: i64,
    pub views: i32,
    pub reply_to_message_id: i64,
    pub forward_info: Option<ForwardInfo>,
    pub sending_state: Option<SendingState>,
}

impl Message {
    /// One-line preview: media label plus caption, or the text itself.
    pub fn preview_text(&self) -> String {
        if let MessageContent::Text { text } = &self.content {
            return text.clone();
        }

        match (self.content.brief_label(), self.content.caption()) {
            (Some(label), Some(caption)) if !caption.is_empty() => {
                format!("{label} {caption}")
            }
            (Some(label), _) => label.to_owned(),
            (None, _) => String::new(),
        }
    }
}
