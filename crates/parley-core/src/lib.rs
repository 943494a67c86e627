//! Dialog engine and port trait definitions for Parley.
//!
//! This crate defines the "ports" (conversation store, fuzzy matcher,
//! interface plugins) that the infrastructure layer implements, plus the
//! per-talker dialog state machine built on top of them. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/IO crate.

pub mod chat;
pub mod interface;
pub mod matcher;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
