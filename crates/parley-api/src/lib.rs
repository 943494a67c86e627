//! Parley gateway application layer.
//!
//! Wires the dialog engine to its adapters (`state`), parses the command
//! line (`cli`) and serves WebSocket clients (`server`). The `parley` binary
//! in `main.rs` is a thin entry point over this library.

pub mod cli;
pub mod server;
pub mod state;
