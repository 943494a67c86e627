//! WebSocket gateway server: accept loop, per-connection handler and the
//! JSON packets exchanged with clients.

pub mod connection;
pub mod listener;
pub mod packet;

pub use connection::{ConnectionError, handle_connection};
pub use listener::{bind, serve};
