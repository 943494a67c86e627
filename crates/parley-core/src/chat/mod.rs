//! Per-talker dialog engine.
//!
//! A [`Chat`] owns one talker's conversation for the lifetime of a
//! connection. It recognizes subjects, hands turns to the active interface
//! and resets the conversation on cancellation or completion.

pub mod session;

pub use session::{Chat, ChatContext};
