use crate::{
    controller::bridge::{Controller, PendingResponse},
    domain::{chat::NotificationSettings, request::Request},
    queries,
    store::chats::ChatStore,
};

/// Outcome of a mute toggle. `Unchanged` means the chat already was in the
/// requested state and no protocol request was produced.
pub enum MuteOutcome {
    ChatMissing,
    Unchanged,
    Requested(PendingResponse),
}

/// Requests the chat to be muted or unmuted. Idempotent at the intent
/// level: toggling to the current state sends nothing.
pub fn set_chat_muted(
    chats: &ChatStore,
    controller: &Controller,
    chat_id: i64,
    mute: bool,
) -> MuteOutcome {
    let chat = match chats.get(chat_id) {
        Some(chat) => chat,
        None => return MuteOutcome::ChatMissing,
    };

    if queries::chat::is_chat_muted(&chat) == mute {
        return MuteOutcome::Unchanged;
    }

    let notification_settings = NotificationSettings {
        use_default_mute_for: false,
        mute_for: queries::chat::muted_value(mute),
    };

    MuteOutcome::Requested(controller.send(Request::SetChatNotificationSettings {
        chat_id,
        notification_settings,
    }))
}
