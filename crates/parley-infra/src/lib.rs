//! Infrastructure layer for Parley.
//!
//! Contains the WebSocket wire protocol and the adapters for the ports
//! defined in `parley-core`: SQLite and in-memory conversation stores, the
//! indel-ratio fuzzy matcher, and the TOML configuration loader.

pub mod config;
pub mod matcher;
pub mod memory;
pub mod sqlite;
pub mod websocket;
