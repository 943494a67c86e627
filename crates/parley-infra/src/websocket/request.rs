//! Bounded reader for the HTTP upgrade request head.
//!
//! Every line is capped at `max_line_bytes`, the number of headers at
//! `max_headers`, and the whole head must arrive within `timeout_secs`.

use std::time::Duration;

use parley_types::config::HandshakeLimits;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::RequestError;

/// Parsed request line and headers of a client's upgrade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRequest {
    pub method: String,
    pub target: String,
    /// Header names as sent, in order.
    pub headers: Vec<(String, String)>,
}

impl UpgradeRequest {
    /// Value of the first header with this name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The client's `Sec-WebSocket-Key`.
    pub fn websocket_key(&self) -> Result<&str, RequestError> {
        self.header("Sec-WebSocket-Key")
            .filter(|key| !key.is_empty())
            .ok_or(RequestError::MissingKey)
    }
}

/// Read the request head, enforcing the configured limits.
///
/// Fails with [`RequestError::MethodNotAllowed`] as soon as the request line
/// names anything but GET; the headers of such a request are never read.
pub async fn read_request<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    limits: &HandshakeLimits,
) -> Result<UpgradeRequest, RequestError> {
    let deadline = Duration::from_secs(limits.timeout_secs);
    tokio::time::timeout(deadline, read_head(reader, limits))
        .await
        .map_err(|_| RequestError::Timeout)?
}

async fn read_head<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    limits: &HandshakeLimits,
) -> Result<UpgradeRequest, RequestError> {
    let mut request_line = read_line(reader, limits.max_line_bytes).await?;
    // Some clients send a stray CRLF ahead of the request
    if request_line.is_empty() {
        request_line = read_line(reader, limits.max_line_bytes).await?;
    }

    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return Err(RequestError::Malformed(format!(
            "bad request line '{request_line}'"
        )));
    };
    if method != "GET" {
        return Err(RequestError::MethodNotAllowed(method.to_string()));
    }
    let method = method.to_string();
    let target = target.to_string();

    let mut headers = Vec::new();
    loop {
        let line = read_line(reader, limits.max_line_bytes).await?;
        if line.is_empty() {
            break;
        }
        if headers.len() == limits.max_headers {
            return Err(RequestError::TooManyHeaders(limits.max_headers));
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(RequestError::Malformed(format!("bad header line '{line}'")));
        };
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    Ok(UpgradeRequest {
        method,
        target,
        headers,
    })
}

/// Read up to and including the next `\n`, returning the line without its
/// terminator (a preceding `\r` is dropped too).
async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_bytes: usize,
) -> Result<String, RequestError> {
    let mut line = Vec::new();
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Err(RequestError::Closed);
        }
        let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
            Some(end) => (&available[..=end], true),
            None => (available, false),
        };
        if line.len() + chunk.len() > max_bytes {
            return Err(RequestError::LineTooLong(max_bytes));
        }
        line.extend_from_slice(chunk);
        let consumed = chunk.len();
        reader.consume(consumed);
        if done {
            break;
        }
    }

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8(line).map_err(|_| RequestError::Malformed("request is not UTF-8".to_string()))
}
