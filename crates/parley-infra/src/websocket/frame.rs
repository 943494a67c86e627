//! WebSocket frame codec (RFC 6455, section 5) restricted to single,
//! unfragmented frames with payloads of at most 125 bytes.
//!
//! ```text
//!  0                   1
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Masking-key (if M = 1)     |
//! |I|S|S|S|  (4)  |A|     (7)     |                               |
//! |N|V|V|V|       |S|             |                               |
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! ```

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::FrameError;

/// Largest payload a frame may carry without extended length encoding.
pub const MAX_PAYLOAD: usize = 125;

/// Status code for a normal closure.
pub const NORMAL_CLOSURE: u16 = 1000;

const FIN: u8 = 0b1000_0000;
const MASK: u8 = 0b1000_0000;
const OPCODE_BITS: u8 = 0b0000_1111;
const LEN_BITS: u8 = 0b0111_1111;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Text,
    Close,
    Ping,
    /// Only ever sent by the server, in answer to a ping.
    Pong,
}

impl Opcode {
    pub fn as_u8(self) -> u8 {
        match self {
            Opcode::Text => 0x1,
            Opcode::Close => 0x8,
            Opcode::Ping => 0x9,
            Opcode::Pong => 0xA,
        }
    }

    /// Opcodes accepted from a client.
    fn from_client(raw: u8) -> Result<Self, FrameError> {
        match raw {
            0x1 => Ok(Opcode::Text),
            0x8 => Ok(Opcode::Close),
            0x9 => Ok(Opcode::Ping),
            other => Err(FrameError::UnsupportedOpcode(other)),
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Opcode::Text => "text",
            Opcode::Close => "close",
            Opcode::Ping => "ping",
            Opcode::Pong => "pong",
        };
        f.write_str(name)
    }
}

/// One decoded frame. The payload is already unmasked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub payload: Vec<u8>,
}

impl Frame {
    /// A CLOSE frame carrying a status code.
    pub fn close(code: u16) -> Self {
        Self {
            opcode: Opcode::Close,
            payload: code.to_be_bytes().to_vec(),
        }
    }

    /// Status code of a CLOSE frame, if it carries one.
    pub fn close_code(&self) -> Option<u16> {
        match (self.opcode, self.payload.as_slice()) {
            (Opcode::Close, [hi, lo, ..]) => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }
}

/// XOR `payload` in place against `mask` repeated cyclically.
///
/// Applying the same mask twice restores the original bytes.
pub fn apply_mask(payload: &mut [u8], mask: [u8; 4]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= mask[i % 4];
    }
}

/// Read one client frame.
///
/// A clean end of stream before the first header byte is reported as a CLOSE
/// frame with status 1000, so callers handle a vanished peer and a polite
/// close the same way. End of stream anywhere later is [`FrameError::PeerReset`].
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Frame, FrameError> {
    let mut head = [0u8; 2];
    if reader.read(&mut head[..1]).await.map_err(reset_or_io)? == 0 {
        return Ok(Frame::close(NORMAL_CLOSURE));
    }
    reader.read_exact(&mut head[1..]).await.map_err(reset_or_io)?;

    if head[0] & FIN == 0 {
        return Err(FrameError::ProtocolViolation("fragmented frames are not supported"));
    }
    let opcode = Opcode::from_client(head[0] & OPCODE_BITS)?;
    if head[1] & MASK == 0 {
        return Err(FrameError::ProtocolViolation("client frames must be masked"));
    }
    let len = usize::from(head[1] & LEN_BITS);
    if len > MAX_PAYLOAD {
        return Err(FrameError::ProtocolViolation("extended payload length is not supported"));
    }

    let mut mask = [0u8; 4];
    reader.read_exact(&mut mask).await.map_err(reset_or_io)?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await.map_err(reset_or_io)?;
    apply_mask(&mut payload, mask);

    Ok(Frame { opcode, payload })
}

/// Encode a single unfragmented, unmasked server frame.
pub fn encode_frame(opcode: Opcode, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge(payload.len()));
    }
    let mut bytes = Vec::with_capacity(2 + payload.len());
    bytes.push(FIN | opcode.as_u8());
    // Fits in the 7-bit length field, checked above
    bytes.push(payload.len() as u8);
    bytes.extend_from_slice(payload);
    Ok(bytes)
}

fn reset_or_io(err: io::Error) -> FrameError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => FrameError::PeerReset,
        _ => FrameError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY: [u8; 4] = [0x37, 0xfa, 0x21, 0x3d];

    /// Build a client frame the way a browser would.
    fn client_frame(first: u8, payload: &[u8]) -> Vec<u8> {
        let mut masked = payload.to_vec();
        apply_mask(&mut masked, KEY);
        let mut bytes = vec![first, MASK | payload.len() as u8];
        bytes.extend_from_slice(&KEY);
        bytes.extend_from_slice(&masked);
        bytes
    }

    #[tokio::test]
    async fn test_read_masked_text_frame() {
        // RFC 6455 section 5.7: masked "Hello"
        let bytes: [u8; 11] = [
            0x81, 0x85, 0x37, 0xfa, 0x21, 0x3d, 0x7f, 0x9f, 0x4d, 0x51, 0x58,
        ];
        let frame = read_frame(&mut &bytes[..]).await.unwrap();
        assert_eq!(frame.opcode, Opcode::Text);
        assert_eq!(frame.payload, b"Hello");
    }

    #[tokio::test]
    async fn test_read_ping_and_close() {
        let mut bytes = client_frame(0x89, b"are you there");
        bytes.extend(client_frame(0x88, &[0x03, 0xe9]));
        let mut reader = &bytes[..];

        let ping = read_frame(&mut reader).await.unwrap();
        assert_eq!(ping.opcode, Opcode::Ping);
        assert_eq!(ping.payload, b"are you there");

        let close = read_frame(&mut reader).await.unwrap();
        assert_eq!(close.close_code(), Some(1001));
    }

    #[tokio::test]
    async fn test_eof_before_frame_synthesizes_close() {
        let frame = read_frame(&mut &b""[..]).await.unwrap();
        assert_eq!(frame.opcode, Opcode::Close);
        assert_eq!(frame.payload, vec![0x03, 0xe8]);
        assert_eq!(frame.close_code(), Some(NORMAL_CLOSURE));
    }

    #[tokio::test]
    async fn test_eof_mid_frame_is_peer_reset() {
        let bytes = client_frame(0x81, b"truncated");
        let err = read_frame(&mut &bytes[..bytes.len() - 3]).await.unwrap_err();
        assert!(matches!(err, FrameError::PeerReset));

        let err = read_frame(&mut &[0x81u8][..]).await.unwrap_err();
        assert!(matches!(err, FrameError::PeerReset));
    }

    #[tokio::test]
    async fn test_fragmented_frame_rejected() {
        let bytes = client_frame(0x01, b"part");
        let err = read_frame(&mut &bytes[..]).await.unwrap_err();
        assert!(matches!(err, FrameError::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn test_unmasked_frame_rejected() {
        let bytes = [0x81, 0x02, b'h', b'i'];
        let err = read_frame(&mut &bytes[..]).await.unwrap_err();
        assert!(matches!(err, FrameError::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn test_extended_length_rejected() {
        for len in [126u8, 127] {
            let bytes = [0x81, MASK | len, 0, 0, 0, 0];
            let err = read_frame(&mut &bytes[..]).await.unwrap_err();
            assert!(matches!(err, FrameError::ProtocolViolation(_)), "len {len}");
        }
    }

    #[tokio::test]
    async fn test_unsupported_opcodes_rejected() {
        // binary, continuation (with FIN), pong
        for first in [0x82u8, 0x80, 0x8A] {
            let bytes = client_frame(first, b"x");
            let err = read_frame(&mut &bytes[..]).await.unwrap_err();
            assert!(
                matches!(err, FrameError::UnsupportedOpcode(op) if op == first & OPCODE_BITS),
                "opcode {first:#x}"
            );
        }
    }

    #[test]
    fn test_encode_text_frame() {
        let bytes = encode_frame(Opcode::Text, b"Hello").unwrap();
        assert_eq!(bytes, [0x81, 0x05, b'H', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn test_encode_pong_and_close() {
        assert_eq!(encode_frame(Opcode::Pong, b"").unwrap(), [0x8A, 0x00]);
        assert_eq!(
            encode_frame(Opcode::Close, &[0x03, 0xe8]).unwrap(),
            [0x88, 0x02, 0x03, 0xe8]
        );
    }

    #[test]
    fn test_encode_payload_limits() {
        assert_eq!(encode_frame(Opcode::Text, &[b'a'; 125]).unwrap().len(), 127);

        let err = encode_frame(Opcode::Text, &[b'a'; 126]).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge(126)));
    }

    proptest! {
        #[test]
        fn mask_is_involutive(
            payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD),
            mask in any::<[u8; 4]>(),
        ) {
            let mut bytes = payload.clone();
            apply_mask(&mut bytes, mask);
            apply_mask(&mut bytes, mask);
            prop_assert_eq!(bytes, payload);
        }
    }
}
