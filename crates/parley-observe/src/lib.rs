//! Observability for Parley: subscriber setup and shared span field names.

pub mod attrs;
pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing};
