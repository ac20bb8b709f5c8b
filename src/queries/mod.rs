//! Derived-view queries: pure, side-effect-free functions computing
//! presentation-ready facts from store state. Re-evaluated on demand, never
//! cached, so results are always consistent with the current snapshots.
//! Store references are passed in explicitly; absent entities degrade to
//! `false`/`None`/empty instead of failing.

pub mod chat;
pub mod group;
pub mod message;
pub mod user;
