use crate::{
    domain::message::{ForwardOrigin, Message, MessageSender},
    store::{chats::ChatStore, users::UserStore},
};

use super::user::user_display_name;

/// An outgoing message is unread until the recipient's read position
/// reaches it. Incoming messages are never "unread" in this sense.
pub fn is_unread(chat_last_read_outbox_message_id: i64, message: &Message) -> bool {
    message.is_outgoing && message.id > chat_last_read_outbox_message_id
}

/// Store-aware variant: an unknown chat means "not yet loaded", which
/// degrades to not-unread.
pub fn is_message_unread(chats: &ChatStore, message: &Message) -> bool {
    chats
        .get(message.chat_id)
        .map(|chat| is_unread(chat.last_read_outbox_message_id, message))
        .unwrap_or(false)
}

pub fn sender_user_id(message: &Message) -> Option<i64> {
    match message.sender {
        MessageSender::User { user_id } => Some(user_id),
        MessageSender::Chat { .. } => None,
    }
}

/// Display title of the message author: the forward origin when present,
/// otherwise the sender. None when the referenced entities are not loaded.
pub fn author_title(users: &UserStore, chats: &ChatStore, message: &Message) -> Option<String> {
    if let Some(forward_info) = &message.forward_info {
        let origin = match &forward_info.origin {
            ForwardOrigin::User { user_id } => {
                users.get(*user_id).map(|user| user_display_name(&user))
            }
            ForwardOrigin::HiddenUser { sender_name } => Some(sender_name.clone()),
            ForwardOrigin::Channel {
                chat_id,
                author_signature,
            } => chats.get(*chat_id).map(|chat| {
                if author_signature.is_empty() {
                    chat.title
                } else {
                    format!("{} ({author_signature})", chat.title)
                }
            }),
        };

        if origin.is_some() {
            return origin;
        }
    }

    sender_title(users, chats, message)
}

fn sender_title(users: &UserStore, chats: &ChatStore, message: &Message) -> Option<String> {
    match message.sender {
        MessageSender::User { user_id } => {
            users.get(user_id).map(|user| user_display_name(&user))
        }
        MessageSender::Chat { chat_id } => chats.get(chat_id).map(|chat| chat.title),
    }
}
