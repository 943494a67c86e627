//! Field-collecting interface.
//!
//! A form declares required and optional fields and whether it needs an
//! attachment. Each turn merges the fields found in the message into the
//! conversation data, then tells the talker what is still missing. The form
//! is complete once every required field (and the attachment, if needed) is
//! present.

use std::collections::BTreeSet;

use parley_types::config::FormSpec;
use parley_types::conversation::Conversation;
use parley_types::error::InterfaceError;

use crate::interface::fields::parse_fields;
use crate::interface::plugin::{Interface, Package};

/// Stored as the attachment when the talker explicitly declines to send one.
pub const ATTACHMENT_SKIPPED: &[u8] = b"Attachment explicitly skipped";

const SKIP_PHRASES: [&str; 4] = [
    "no attachment",
    "without attachment",
    "skip attachment",
    "drop attachment",
];

pub struct FormInterface {
    aliases: BTreeSet<String>,
    required: BTreeSet<String>,
    optional: BTreeSet<String>,
    attachment: bool,
    skip_threshold: u8,
}

impl FormInterface {
    pub fn new(spec: &FormSpec, skip_threshold: u8) -> Self {
        Self {
            aliases: spec.aliases.iter().cloned().collect(),
            required: spec.required.iter().cloned().collect(),
            optional: spec.optional.iter().cloned().collect(),
            attachment: spec.attachment,
            skip_threshold,
        }
    }

    fn accepts(&self, field: &str) -> bool {
        self.required.contains(field) || self.optional.contains(field)
    }

    fn wants_skip(&self, package: &Package<'_>) -> bool {
        self.attachment
            && package
                .matcher
                .best_match(&package.message.text, &SKIP_PHRASES)
                .is_some_and(|m| m.score > self.skip_threshold)
    }

    fn merge_fields(&self, package: &mut Package<'_>) {
        let fields = match parse_fields(&package.message.text) {
            Ok(fields) => fields,
            Err(err) => {
                package.reply(err.to_string());
                return;
            }
        };
        for (key, value) in fields {
            if self.accepts(&key) {
                package.conversation.data.insert(key, value);
            } else {
                package.reply(format!("Field '{key}' is not valid, ignoring"));
            }
        }
    }

    fn missing_report(&self, conversation: &Conversation) -> String {
        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|f| !conversation.data.contains_key(*f))
            .map(|f| f.as_str())
            .collect();
        let optional: Vec<&str> = self
            .optional
            .iter()
            .filter(|f| !conversation.data.contains_key(*f))
            .map(|f| f.as_str())
            .collect();

        let mut lines = Vec::new();
        if !missing.is_empty() {
            lines.push(format!("I miss fields: {}", missing.join(", ")));
        }
        if !optional.is_empty() {
            lines.push(format!("Optional fields: {}", optional.join(", ")));
        }
        if self.attachment && conversation.attachment.is_empty() {
            lines.push("I need attachment".to_string());
        }
        lines.join("\n")
    }

    fn summary(&self, conversation: &Conversation) -> String {
        let mut keys: Vec<&String> = conversation.data.keys().collect();
        keys.sort();
        let fields: Vec<String> = keys
            .into_iter()
            .map(|key| match &conversation.data[key] {
                serde_json::Value::String(s) => format!("{key}={s}"),
                other => format!("{key}={other}"),
            })
            .collect();
        if fields.is_empty() {
            "Done.".to_string()
        } else {
            format!("Done: {}", fields.join(", "))
        }
    }
}

impl Interface for FormInterface {
    fn aliases(&self) -> BTreeSet<String> {
        self.aliases.clone()
    }

    async fn consume(&self, package: &mut Package<'_>) -> Result<(), InterfaceError> {
        if self.wants_skip(package) {
            package.conversation.attachment = ATTACHMENT_SKIPPED.to_vec();
            package.reply("Skipping attachment");
        } else if !package.message.text.trim().is_empty() {
            self.merge_fields(package);
        }

        if !package.message.binary.is_empty() {
            if self.attachment {
                package.conversation.attachment = package.message.binary.clone();
            } else {
                package.reply("I don't need attachment so I ignore it");
            }
        }

        let reply = if self.is_complete(package.conversation) {
            self.summary(package.conversation)
        } else {
            self.missing_report(package.conversation)
        };
        package.reply(reply);
        Ok(())
    }

    fn is_complete(&self, conversation: &Conversation) -> bool {
        self.required
            .iter()
            .all(|field| conversation.data.contains_key(field))
            && (!self.attachment || !conversation.attachment.is_empty())
    }
}
