//! Interfaces shipped with the gateway.
//!
//! - [`HelpInterface`]: lists the available commands; also the fallback
//!   subject when a request is not understood.
//! - [`EchoInterface`]: sends every message back until cancelled.
//! - [`FormInterface`]: collects configured fields over several turns.

pub mod echo;
pub mod form;
pub mod help;

pub use echo::EchoInterface;
pub use form::FormInterface;
pub use help::HelpInterface;
