//! Pluggable command handling.
//!
//! An [`Interface`] answers to one or more aliases, consumes the turns of a
//! conversation while its alias is the active subject, and declares when the
//! subject is complete. Interfaces are registered once at startup in the
//! [`InterfaceRegistry`], which is read-only afterwards.

pub mod box_interface;
pub mod builtin;
pub mod fields;
pub mod plugin;
pub mod registry;

pub use box_interface::BoxInterface;
pub use plugin::{Interface, Package, ReplySender};
pub use registry::InterfaceRegistry;
