use thiserror::Error;

use crate::{
    controller::bridge::{Controller, PendingResponse},
    domain::request::Request,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTextCommand {
    pub chat_id: i64,
    pub reply_to_message_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendTextError {
    #[error("message text is empty")]
    EmptyText,
}

/// Validates and submits a text message. The text is trimmed; a message
/// that is empty after trimming is rejected without touching the transport.
pub fn send_text(
    controller: &Controller,
    command: SendTextCommand,
) -> Result<PendingResponse, SendTextError> {
    let text = command.text.trim();
    if text.is_empty() {
        return Err(SendTextError::EmptyText);
    }

    Ok(controller.send(Request::SendMessage {
        chat_id: command.chat_id,
        reply_to_message_id: command.reply_to_message_id,
        text: text.to_owned(),
    }))
}
