//! TCP accept loop.
//!
//! One tokio task per accepted connection. The loop stops accepting when the
//! cancellation token fires; connections already running are left to finish.

use std::io;
use std::net::SocketAddr;

use parley_observe::attrs::CONNECTION_SPAN;
use tokio::net::{TcpListener, TcpSocket};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::connection::{ConnectionError, handle_connection};
use crate::state::GatewayState;

const BACKLOG: u32 = 1024;

/// Bind the listening socket.
///
/// With `force_bind` SO_REUSEADDR is set, so a restart does not wait for
/// sockets of the previous process lingering in TIME_WAIT.
pub async fn bind(host: &str, port: u16, force_bind: bool) -> io::Result<TcpListener> {
    let addr = tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, format!("cannot resolve {host}")))?;

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(force_bind)?;
    socket.bind(addr)?;
    socket.listen(BACKLOG)
}

/// Accept connections until `shutdown` is cancelled.
pub async fn serve(listener: TcpListener, state: GatewayState, shutdown: CancellationToken) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Listener stopped");
                return;
            }
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::warn!(error = %err, "Accept failed");
                    continue;
                }
            },
        };

        let span = tracing::info_span!(CONNECTION_SPAN, peer = %peer);
        let state = state.clone();
        tokio::spawn(
            async move {
                tracing::debug!("Connection accepted");
                match handle_connection(stream, peer, state).await {
                    Ok(()) => tracing::debug!("Connection finished"),
                    Err(ConnectionError::Frame(err)) => {
                        tracing::warn!(error = %err, "Connection dropped")
                    }
                    Err(err) => tracing::info!(error = %err, "Connection ended"),
                }
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind("127.0.0.1", 0, false).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_force_bind_reuses_port() {
        let first = bind("127.0.0.1", 0, true).await.unwrap();
        let port = first.local_addr().unwrap().port();
        drop(first);

        let second = bind("127.0.0.1", port, true).await.unwrap();
        assert_eq!(second.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        assert!(bind("no such host.invalid", 0, false).await.is_err());
    }
}
