//! Application payloads carried in TEXT frames.
//!
//! Inbound: `{"text": "..."}`. Outbound: `{"author": "...", "text": "..."}`.
//! A reply too long for one frame is split into several packets, each a
//! complete JSON object carrying the next piece of the text.

use parley_infra::websocket::{FrameError, MAX_PAYLOAD, Opcode, encode_frame};
use serde::Serialize;
use thiserror::Error;

/// Why an inbound TEXT payload was not accepted.
#[derive(Debug, Error)]
pub enum PacketError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an object with a string 'text' field")]
    MissingText,
}

#[derive(Debug, Serialize)]
struct Outbound<'a> {
    author: &'a str,
    text: &'a str,
}

/// Extract the `text` field of an inbound packet.
///
/// Only a JSON object qualifies; arrays and scalars are rejected even when
/// their first element is a string.
pub fn parse_inbound(payload: &[u8]) -> Result<String, PacketError> {
    let value: serde_json::Value = serde_json::from_slice(payload)?;
    value
        .as_object()
        .and_then(|packet| packet.get("text"))
        .and_then(|text| text.as_str())
        .map(str::to_string)
        .ok_or(PacketError::MissingText)
}

/// Encode a reply as one or more TEXT frames, in order.
pub fn reply_frames(author: &str, text: &str) -> Result<Vec<Vec<u8>>, FrameError> {
    let whole = packet(author, text);
    if whole.len() <= MAX_PAYLOAD {
        return Ok(vec![encode_frame(Opcode::Text, &whole)?]);
    }

    let overhead = packet(author, "").len();
    if overhead >= MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge(overhead));
    }
    let room = MAX_PAYLOAD - overhead;

    let mut frames = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (at, ch) in text.char_indices() {
        let cost = escaped_len(ch);
        if used + cost > room {
            if used == 0 {
                return Err(FrameError::PayloadTooLarge(overhead + cost));
            }
            frames.push(encode_frame(Opcode::Text, &packet(author, &text[start..at]))?);
            start = at;
            used = 0;
        }
        used += cost;
    }
    frames.push(encode_frame(Opcode::Text, &packet(author, &text[start..]))?);
    Ok(frames)
}

fn packet(author: &str, text: &str) -> Vec<u8> {
    // Serializing two borrowed strings cannot fail
    serde_json::to_vec(&Outbound { author, text }).unwrap_or_default()
}

/// Bytes `ch` occupies inside a JSON string literal.
fn escaped_len(ch: char) -> usize {
    let mut buf = [0u8; 4];
    serde_json::to_string(ch.encode_utf8(&mut buf) as &str)
        .map(|quoted| quoted.len() - 2)
        .unwrap_or(6)
}
