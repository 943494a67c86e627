//! Gateway configuration types for Parley.
//!
//! `GatewayConfig` represents the top-level `config.toml`: listening
//! address, bot name, conversation storage, dialog thresholds, handshake
//! limits and config-declared field forms. Every field has a default so an
//! empty file is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// TCP port the WebSocket listener binds to.
    #[serde(default = "default_port")]
    pub websocket_port: u16,

    /// Interface address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bot name sent as `author` in every outbound packet.
    #[serde(default = "default_author")]
    pub author: String,

    /// SQLite database file. When absent conversations live in memory only.
    #[serde(default)]
    pub database: Option<PathBuf>,

    #[serde(default)]
    pub chat: ChatSettings,

    #[serde(default)]
    pub handshake: HandshakeLimits,

    /// Field-collecting interfaces declared in configuration.
    #[serde(default)]
    pub forms: Vec<FormSpec>,
}

fn default_port() -> u16 {
    8765
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_author() -> String {
    "Oscar".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            websocket_port: default_port(),
            host: default_host(),
            author: default_author(),
            database: None,
            chat: ChatSettings::default(),
            handshake: HandshakeLimits::default(),
            forms: Vec::new(),
        }
    }
}

/// Fuzzy-match thresholds and phrases driving the dialog state machine.
///
/// Scores are on the 0..=100 scale produced by the fuzzy matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Minimum score (inclusive) for a message to select a subject.
    #[serde(default = "default_subject_threshold")]
    pub subject_threshold: u8,

    /// Score a message must exceed to cancel the active subject.
    #[serde(default = "default_cancel_threshold")]
    pub cancel_threshold: u8,

    /// Score a message must exceed to skip a required attachment.
    #[serde(default = "default_attachment_skip_threshold")]
    pub attachment_skip_threshold: u8,

    /// Subject assigned when the talker's request was not understood.
    #[serde(default = "default_help_alias")]
    pub help_alias: String,

    #[serde(default = "default_cancel_phrases")]
    pub cancel_phrases: Vec<String>,
}

fn default_subject_threshold() -> u8 {
    95
}

fn default_cancel_threshold() -> u8 {
    97
}

fn default_attachment_skip_threshold() -> u8 {
    98
}

fn default_help_alias() -> String {
    "help".to_string()
}

fn default_cancel_phrases() -> Vec<String> {
    ["no", "cancel", "stop", "stop it", "forget", "start again", "naah"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            subject_threshold: default_subject_threshold(),
            cancel_threshold: default_cancel_threshold(),
            attachment_skip_threshold: default_attachment_skip_threshold(),
            help_alias: default_help_alias(),
            cancel_phrases: default_cancel_phrases(),
        }
    }
}

/// Limits applied while reading the HTTP upgrade request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeLimits {
    /// Longest accepted request or header line, terminator included.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,

    #[serde(default = "default_max_headers")]
    pub max_headers: usize,

    /// Deadline for the whole request head.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_line_bytes() -> usize {
    4096
}

fn default_max_headers() -> usize {
    64
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HandshakeLimits {
    fn default() -> Self {
        Self {
            max_line_bytes: default_max_line_bytes(),
            max_headers: default_max_headers(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A field-collecting command declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    pub aliases: Vec<String>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
    /// Whether the form needs an attachment before it is complete.
    #[serde(default)]
    pub attachment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_default_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.websocket_port, 8765);
        assert_eq!(config.author, "Oscar");
        assert!(config.database.is_none());
        assert_eq!(config.chat.subject_threshold, 95);
        assert_eq!(config.chat.cancel_threshold, 97);
        assert_eq!(config.chat.attachment_skip_threshold, 98);
        assert_eq!(config.chat.help_alias, "help");
        assert_eq!(config.chat.cancel_phrases.len(), 7);
        assert!(config.forms.is_empty());
    }

    #[test]
    fn test_gateway_config_deserialize_with_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.websocket_port, 8765);
        assert_eq!(config.handshake.max_line_bytes, 4096);
        assert_eq!(config.handshake.timeout_secs, 10);
    }

    #[test]
    fn test_gateway_config_deserialize_with_values() {
        let toml_str = r#"
websocket_port = 9001
author = "Zoe"
database = "/tmp/parley.db"

[chat]
subject_threshold = 90

[[forms]]
aliases = ["add partner", "create partner"]
required = ["name"]
optional = ["other_names"]

[[forms]]
aliases = ["upload invoice"]
attachment = true
"#;
        let config: GatewayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.websocket_port, 9001);
        assert_eq!(config.author, "Zoe");
        assert_eq!(config.database, Some(PathBuf::from("/tmp/parley.db")));
        assert_eq!(config.chat.subject_threshold, 90);
        // Untouched settings keep their defaults
        assert_eq!(config.chat.cancel_threshold, 97);
        assert_eq!(config.forms.len(), 2);
        assert_eq!(config.forms[0].required, vec!["name".to_string()]);
        assert!(!config.forms[0].attachment);
        assert!(config.forms[1].attachment);
        assert!(config.forms[1].required.is_empty());
    }
}
