//! One client connection: upgrade handshake, then the frame loop.
//!
//! Frames are handled strictly in order. A TEXT frame is fully processed
//! (dialog turn plus every reply written) before the next frame is read.

use std::net::SocketAddr;

use parley_core::chat::Chat;
use parley_infra::websocket::{
    Frame, FrameError, Opcode, RequestError, encode_frame, handshake, read_frame, read_request,
};
use parley_types::conversation::Message;
use parley_types::error::ChatError;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::packet::{parse_inbound, reply_frames};
use crate::state::GatewayState;

/// Why a connection ended abnormally.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("handshake failed: {0}")]
    Handshake(#[from] RequestError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("could not load conversation: {0}")]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Serve one accepted connection until the client closes it.
pub async fn handle_connection<S>(
    stream: S,
    peer: SocketAddr,
    state: GatewayState,
) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut stream = BufReader::new(stream);

    let key = match read_request(&mut stream, &state.limits)
        .await
        .and_then(|request| request.websocket_key().map(str::to_string))
    {
        Ok(key) => key,
        Err(err) => {
            if let Some(response) = err.response() {
                // The client is told why; a failed write changes nothing
                let _ = stream.write_all(response).await;
                let _ = stream.shutdown().await;
            }
            return Err(err.into());
        }
    };

    stream.write_all(&handshake(&key)).await?;
    tracing::debug!("Handshake complete");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut chat = Chat::load(&peer.to_string(), state.connection_context(), tx).await?;
    if let Err(err) = chat.greet().await {
        tracing::warn!(error = %err, "Greeting failed");
    }
    flush_replies(&mut stream, &mut rx, &state.author).await?;

    loop {
        let Frame { opcode, payload } = read_frame(&mut stream).await?;
        tracing::trace!(%opcode, len = payload.len(), "Frame received");

        match opcode {
            Opcode::Text => {
                match parse_inbound(&payload) {
                    Ok(text) => {
                        if let Err(err) = chat.ask(Message::text(text)).await {
                            tracing::warn!(talker = %chat.talker(), error = %err, "Dialog turn failed");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Dropping malformed packet");
                    }
                }
                flush_replies(&mut stream, &mut rx, &state.author).await?;
            }
            Opcode::Ping => {
                stream.write_all(&encode_frame(Opcode::Pong, &payload)?).await?;
            }
            Opcode::Close => {
                // The peer may already be gone (synthesized close)
                let _ = stream.write_all(&encode_frame(Opcode::Close, &payload)?).await;
                let _ = stream.flush().await;
                tracing::debug!("Client closed the connection");
                return Ok(());
            }
            Opcode::Pong => {}
        }
    }
}

/// Write every queued reply as TEXT frames.
async fn flush_replies<W: AsyncWrite + Unpin>(
    stream: &mut W,
    rx: &mut UnboundedReceiver<Message>,
    author: &str,
) -> Result<(), ConnectionError> {
    while let Ok(reply) = rx.try_recv() {
        for frame in reply_frames(author, &reply.text)? {
            stream.write_all(&frame).await?;
        }
    }
    stream.flush().await?;
    Ok(())
}
