//! Structured field extraction from free-text messages.
//!
//! Talkers send fields either as JSON (`{"name": "ACME"}`, or a one-element
//! array of such objects) or as `key: value` / `key = value` lines.

use serde_json::{Map, Value};
use thiserror::Error;

/// Fields extracted from one message.
pub type FieldSet = Map<String, Value>;

/// Why a message could not be read as a set of fields.
///
/// The display strings are written for the talker.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("I found no fields in your message")]
    Empty,

    #[error("I couldn't read that JSON: {0}")]
    InvalidJson(String),

    #[error("Sorry, not more than one record at a time ({0} sent). Do not duplicate fields")]
    MultipleRecords(usize),

    #[error("I can't read '{0}'. Send fields as 'name: value'")]
    NotAField(String),
}

/// Parse the fields carried by a message text.
pub fn parse_fields(text: &str) -> Result<FieldSet, FieldParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FieldParseError::Empty);
    }
    if text.starts_with('{') || text.starts_with('[') {
        return parse_json(text);
    }
    parse_lines(text)
}

fn parse_json(text: &str) -> Result<FieldSet, FieldParseError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| FieldParseError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(fields) => non_empty(fields),
        Value::Array(mut records) => match records.len() {
            0 => Err(FieldParseError::Empty),
            1 => match records.remove(0) {
                Value::Object(fields) => non_empty(fields),
                _ => Err(FieldParseError::InvalidJson(
                    "expected an object of fields".to_string(),
                )),
            },
            n => Err(FieldParseError::MultipleRecords(n)),
        },
        _ => Err(FieldParseError::InvalidJson(
            "expected an object of fields".to_string(),
        )),
    }
}

fn parse_lines(text: &str) -> Result<FieldSet, FieldParseError> {
    let mut fields = FieldSet::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(split) = line.find([':', '=']) else {
            return Err(FieldParseError::NotAField(line.to_string()));
        };
        let key = line[..split].trim();
        if key.is_empty() {
            return Err(FieldParseError::NotAField(line.to_string()));
        }
        let value = line[split + 1..].trim();
        fields.insert(key.to_string(), Value::String(value.to_string()));
    }
    non_empty(fields)
}

fn non_empty(fields: FieldSet) -> Result<FieldSet, FieldParseError> {
    if fields.is_empty() {
        Err(FieldParseError::Empty)
    } else {
        Ok(fields)
    }
}
