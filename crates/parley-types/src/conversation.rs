//! Conversation and message types for Parley.
//!
//! A `Conversation` is the durable per-talker record the dialog engine
//! works on; a `Message` is one piece of communication in either direction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Communication piece between a talker and the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binary: Vec<u8>,
}

impl Message {
    /// A text-only message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            binary: Vec::new(),
        }
    }
}

/// Conversation with one talker who requests actions.
///
/// Keyed by `talker`. `subject` is empty when no command is active and
/// `attachment` is empty when nothing has been attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub talker: String,
    #[serde(default)]
    pub ongoing: bool,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub attachment: Vec<u8>,
}

impl Conversation {
    /// A fresh zero-valued conversation for a talker seen for the first time.
    pub fn new(talker: impl Into<String>) -> Self {
        Self {
            talker: talker.into(),
            ..Self::default()
        }
    }

    /// Whether a subject is currently being worked through.
    pub fn has_subject(&self) -> bool {
        !self.subject.is_empty()
    }

    /// Drop subject, collected data and attachment. `ongoing` is kept.
    pub fn reset(&mut self) {
        self.subject.clear();
        self.data.clear();
        self.attachment.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_zero_valued() {
        let conv = Conversation::new("127.0.0.1:5000");
        assert_eq!(conv.talker, "127.0.0.1:5000");
        assert!(!conv.ongoing);
        assert!(!conv.has_subject());
        assert!(conv.data.is_empty());
        assert!(conv.attachment.is_empty());
    }

    #[test]
    fn test_reset_keeps_ongoing() {
        let mut conv = Conversation::new("t");
        conv.ongoing = true;
        conv.subject = "add partner".to_string();
        conv.data
            .insert("name".to_string(), serde_json::json!("ACME"));
        conv.attachment = b"pdf".to_vec();

        conv.reset();

        assert!(conv.ongoing);
        assert_eq!(conv.subject, "");
        assert!(conv.data.is_empty());
        assert!(conv.attachment.is_empty());
    }

    #[test]
    fn test_conversation_deserialize_with_defaults() {
        let conv: Conversation = serde_json::from_str(r#"{"talker":"bob"}"#).unwrap();
        assert_eq!(conv, Conversation::new("bob"));
    }

    #[test]
    fn test_message_skips_empty_binary() {
        let json = serde_json::to_string(&Message::text("hi")).unwrap();
        assert_eq!(json, r#"{"text":"hi"}"#);
    }
}
