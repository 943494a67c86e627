//! Hand-rolled WebSocket server protocol.
//!
//! - `request`: bounded, deadline-guarded reader for the HTTP upgrade head
//! - `handshake`: `Sec-WebSocket-Accept` computation and the 101 response
//! - `frame`: single-frame codec for text, ping/pong and close

pub mod frame;
pub mod handshake;
pub mod request;

use thiserror::Error;

pub use frame::{Frame, MAX_PAYLOAD, NORMAL_CLOSURE, Opcode, apply_mask, encode_frame, read_frame};
pub use handshake::{accept_key, handshake};
pub use request::{UpgradeRequest, read_request};

/// Errors while reading or writing frames.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    #[error("unsupported opcode {0:#x}")]
    UnsupportedOpcode(u8),

    #[error("payload of {0} bytes exceeds the 125 byte frame limit")]
    PayloadTooLarge(usize),

    #[error("connection reset by peer")]
    PeerReset,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors while reading the upgrade request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request line or header longer than {0} bytes")]
    LineTooLong(usize),

    #[error("more than {0} headers")]
    TooManyHeaders(usize),

    #[error("request head not received in time")]
    Timeout,

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("missing Sec-WebSocket-Key header")]
    MissingKey,

    #[error("client closed the connection during the handshake")]
    Closed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RequestError {
    /// HTTP response to send before closing, if any.
    ///
    /// Non-GET requests, closed and failed sockets get no response.
    pub fn response(&self) -> Option<&'static [u8]> {
        match self {
            RequestError::LineTooLong(_) | RequestError::TooManyHeaders(_) => {
                Some(b"HTTP/1.1 431 Request Header Fields Too Large\r\n\r\n".as_slice())
            }
            RequestError::Timeout => Some(b"HTTP/1.1 408 Request Timeout\r\n\r\n".as_slice()),
            RequestError::Malformed(_) => Some(b"HTTP/1.1 400 Bad Request\r\n\r\n".as_slice()),
            RequestError::MissingKey => {
                Some(b"HTTP/1.1 400 Missing Sec-WebSocket-Key header\r\n\r\n".as_slice())
            }
            RequestError::MethodNotAllowed(_) | RequestError::Closed | RequestError::Io(_) => None,
        }
    }
}
