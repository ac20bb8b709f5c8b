//! Store layer: keyed in-memory entity caches with narrow publish/subscribe.
//!
//! Stores are the single source of truth for entity snapshots. Only the
//! update dispatcher mutates them; consumers read snapshots with `get` and
//! subscribe to per-kind change events.

pub mod app;
pub mod bus;
pub mod chats;
pub mod entity;
pub mod files;
pub mod groups;
pub mod messages;
pub mod users;
