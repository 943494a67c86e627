//! Conversation persistence abstractions for Parley.
//!
//! This module defines the `ConversationStore` trait that the infrastructure
//! layer implements, and `BoxConversationStore` for picking a backend at
//! runtime (in-memory or SQLite).

pub mod box_store;
pub mod conversation;

pub use box_store::BoxConversationStore;
pub use conversation::ConversationStore;
