//! Single client session handling

use crate::actuator::MotorOutput;
use crate::command::{CommandDispatcher, CommandResult};
use crate::transport::TransportStream;
use anyhow::Result;
use bytes::BytesMut;
use motorcontrol_shared::{protocol, strip_line_endings, LineDecoder, SessionEvent};
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, warn};

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Client sent the quit token
    Quit,
    /// Client closed the connection
    PeerClosed,
    /// Receiving failed or the client broke the line length limit
    TransportError(String),
}

impl SessionEnd {
    /// State machine event for this outcome
    pub fn event(&self) -> SessionEvent {
        match self {
            SessionEnd::Quit => SessionEvent::Quit,
            SessionEnd::PeerClosed => SessionEvent::PeerClosed,
            SessionEnd::TransportError(_) => SessionEvent::TransportError,
        }
    }
}

/// One accepted client connection
pub struct ControlSession<S: TransportStream> {
    stream: S,
    peer: SocketAddr,
    decoder: LineDecoder,
    read_buf: BytesMut,
    peer_closed: bool,
}

impl<S: TransportStream> ControlSession<S> {
    /// Create a session whose lines may be at most `buffer_size` bytes
    pub fn new(stream: S, peer: SocketAddr, buffer_size: usize) -> Self {
        Self {
            stream,
            peer,
            decoder: LineDecoder::new(buffer_size),
            read_buf: BytesMut::with_capacity(buffer_size),
            peer_closed: false,
        }
    }

    /// Get the remote address
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Read the next raw line from the client
    /// Returns None once the client has closed the connection
    pub async fn recv_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(line) = self.decoder.decode_next()? {
                return Ok(Some(line));
            }
            if self.peer_closed {
                return Ok(self.decoder.finish());
            }

            self.read_buf.clear();
            let n = self.stream.read_buf(&mut self.read_buf).await?;
            if n == 0 {
                self.peer_closed = true;
            } else {
                debug!("Received {} bytes from {}", n, self.peer);
                self.decoder.extend(&self.read_buf);
            }
        }
    }

    /// Serve commands until the client quits, disconnects or errors
    pub async fn run<M: MotorOutput>(
        &mut self,
        output: &mut M,
        dispatcher: &CommandDispatcher,
    ) -> SessionEnd {
        loop {
            let raw = match self.recv_line().await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    info!("Client disconnected: {}", self.peer);
                    return SessionEnd::PeerClosed;
                }
                Err(e) => {
                    error!("Receive error from {}: {:#}", self.peer, e);
                    self.close().await;
                    return SessionEnd::TransportError(e.to_string());
                }
            };

            let line = strip_line_endings(&raw);
            if line == protocol::QUIT {
                info!("Client {} quit", self.peer);
                self.close().await;
                return SessionEnd::Quit;
            }
            if line.trim().is_empty() {
                debug!("Ignoring empty line from {}", self.peer);
                continue;
            }

            let result = dispatcher.dispatch(output, &line);
            log_result(&line, &result);
        }
    }

    /// Close the connection; errors here only matter for logging
    pub async fn close(&mut self) {
        if let Err(e) = self.stream.disconnect().await {
            debug!("Disconnect from {} failed: {:#}", self.peer, e);
        }
    }
}

fn log_result(line: &str, result: &CommandResult) {
    match result {
        Ok(entry) => info!("Executed \"{}\" ({})", line, entry.name),
        Err(e) => warn!(code = e.code(), "ERROR ({}): {}", e.code(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::mock::RecordingOutput;
    use crate::actuator::{MotorId, MotorState};
    use async_trait::async_trait;
    use tokio::io::{AsyncWriteExt, DuplexStream};

    #[async_trait]
    impl TransportStream for DuplexStream {
        async fn disconnect(&mut self) -> Result<()> {
            AsyncWriteExt::shutdown(self).await?;
            Ok(())
        }
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    /// Feed `input` to a fresh session, close the client side, run to the end
    async fn serve(input: &[u8], buffer_size: usize) -> (SessionEnd, Vec<(MotorId, MotorState)>) {
        let (mut client, server) = tokio::io::duplex(1024);
        client.write_all(input).await.unwrap();
        drop(client);

        let mut output = RecordingOutput::new();
        let mut session = ControlSession::new(server, peer(), buffer_size);
        let end = session.run(&mut output, &CommandDispatcher::default()).await;
        (end, output.calls())
    }

    #[tokio::test]
    async fn test_commands_until_peer_close() {
        let (end, calls) = serve(b"fwd\r\nsetm B 0 0\n", 64).await;
        assert_eq!(end, SessionEnd::PeerClosed);
        assert_eq!(
            calls,
            vec![
                (MotorId::A, MotorState::FORWARD),
                (MotorId::B, MotorState::FORWARD),
                (MotorId::B, MotorState::DISABLED),
            ]
        );
    }

    #[tokio::test]
    async fn test_quit_ends_session_and_drops_later_lines() {
        let (end, calls) = serve(b"back\nquit\r\nfwd\n", 64).await;
        assert_eq!(end, SessionEnd::Quit);
        assert_eq!(
            calls,
            vec![
                (MotorId::A, MotorState::REVERSE),
                (MotorId::B, MotorState::REVERSE),
            ]
        );
    }

    #[tokio::test]
    async fn test_quit_must_match_exactly() {
        let (end, calls) = serve(b"quit now\nQUIT\n", 64).await;
        assert_eq!(end, SessionEnd::PeerClosed);
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_errors_do_not_end_session() {
        let (end, calls) = serve(b"jump\nsetm\nsetm X 1 0\nstop\n", 64).await;
        assert_eq!(end, SessionEnd::PeerClosed);
        assert_eq!(
            calls,
            vec![
                (MotorId::A, MotorState::DISABLED),
                (MotorId::B, MotorState::DISABLED),
            ]
        );
    }

    #[tokio::test]
    async fn test_line_endings_stripped_anywhere() {
        let (_, calls) = serve(b"fw\rd\r\n", 64).await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (MotorId::A, MotorState::FORWARD));
    }

    #[tokio::test]
    async fn test_empty_lines_are_ignored() {
        let (end, calls) = serve(b"\r\n\n   \nquit\n", 64).await;
        assert_eq!(end, SessionEnd::Quit);
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_unterminated_last_line_is_processed() {
        let (end, calls) = serve(b"fwd\nstop", 64).await;
        assert_eq!(end, SessionEnd::PeerClosed);
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[3], (MotorId::B, MotorState::DISABLED));
    }

    #[tokio::test]
    async fn test_oversized_line_is_a_transport_error() {
        let (end, calls) = serve(b"fwd\nsetm A 1 0 and a lot more text\n", 16).await;
        assert!(matches!(end, SessionEnd::TransportError(_)));
        assert_eq!(end.event(), SessionEvent::TransportError);
        // Lines before the oversized one still ran
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn test_quit_disconnects_client() {
        let (mut client, server) = tokio::io::duplex(64);
        client.write_all(b"quit\n").await.unwrap();

        let mut output = RecordingOutput::new();
        let mut session = ControlSession::new(server, peer(), 64);
        let end = session.run(&mut output, &CommandDispatcher::default()).await;
        assert_eq!(end, SessionEnd::Quit);

        let mut buf = [0u8; 8];
        let n = client.read(&mut buf).await.unwrap();
        assert_eq!(n, 0, "server side should be shut down");
    }
}
