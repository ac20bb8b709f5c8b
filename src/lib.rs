//! Observable client-side state core for Telegram-style messaging clients.
//!
//! The crate keeps consistent, in-memory entity state derived from an
//! asynchronous stream of protocol updates and from request/response calls,
//! and notifies consumers of exactly the deltas they subscribed to. The
//! view layer stays outside: it reads snapshots (`Store::get`), subscribes
//! to named events (`Store::on`/`off`), and issues intents through the
//! controller ([`Controller::send`], [`Controller::client_update`]). The
//! protocol transport also stays outside, behind the [`Transport`] trait:
//! this crate never sees wire bytes, only tagged payloads.
//!
//! Construction goes through [`CoreContext`], which owns the stores, the
//! controller, and the scheduled-action registry with a defined
//! initialization order and explicit teardown.

pub mod context;
pub mod controller;
pub mod domain;
pub mod infra;
pub mod queries;
pub mod store;
pub mod usecases;

#[cfg(test)]
mod test_support;

pub use context::CoreContext;
pub use controller::bridge::{Controller, PendingResponse};
pub use controller::contracts::{
    RequestEnvelope, RequestError, Transport, TransportError, TransportEvent,
};
pub use controller::scheduled::{ActionKey, ActionKind, ScheduledActionRegistry};
