//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the gateway:
//! Conversation, Message, the gateway configuration and the error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
