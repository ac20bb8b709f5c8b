//! Use case layer: user-facing intents composed from the controller, the
//! stores, and the scheduled-action registry.

pub mod destructive;
pub mod history;
pub mod mute;
pub mod open_chat;
pub mod send_text;
