//! Accept loop serving one client at a time

use super::connection::{ControlSession, SessionEnd};
use crate::actuator::MotorOutput;
use crate::command::CommandDispatcher;
use crate::transport::TransportListener;
use anyhow::Result;
use motorcontrol_shared::{SessionEvent, SessionStateMachine, TransitionResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Pause after a failed accept before trying again
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// The control server: owns the listener, the motors and the dispatcher
pub struct ControlServer<L: TransportListener, M: MotorOutput> {
    listener: L,
    output: M,
    dispatcher: CommandDispatcher,
    fsm: SessionStateMachine,
    buffer_size: usize,
}

impl<L: TransportListener, M: MotorOutput> ControlServer<L, M> {
    pub fn new(listener: L, output: M, dispatcher: CommandDispatcher, buffer_size: usize) -> Self {
        Self {
            listener,
            output,
            dispatcher,
            fsm: SessionStateMachine::new(),
            buffer_size,
        }
    }

    pub fn sessions_served(&self) -> u64 {
        self.fsm.sessions_served()
    }

    /// Serve clients one after another until `shutdown` resolves
    ///
    /// Every motor is disabled before each accept and once more on the way
    /// out. Shutdown interrupts both the accept wait and an active session.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.output.disable_all();

            info!("Waiting for incoming connection...");
            let accepted = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => accepted,
            };

            let (stream, peer) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Accept failed: {:#}", e);
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };

            info!("Connection from {} via {}", peer, self.listener.name());
            self.transition(SessionEvent::Accepted);

            let mut session = ControlSession::new(stream, peer, self.buffer_size);
            let end = tokio::select! {
                _ = &mut shutdown => None,
                end = session.run(&mut self.output, &self.dispatcher) => Some(end),
            };

            match end {
                Some(end) => {
                    if let SessionEnd::TransportError(reason) = &end {
                        warn!("Session with {} dropped: {}", peer, reason);
                    }
                    self.transition(end.event());
                }
                None => {
                    session.close().await;
                    break;
                }
            }
        }

        self.output.disable_all();
        info!("Shutdown: all motors disabled");
        Ok(())
    }

    fn transition(&mut self, event: SessionEvent) {
        match self.fsm.process_event(event) {
            TransitionResult::Success(state) => debug!("Session state -> {:?}", state),
            TransitionResult::Invalid { from, event } => {
                warn!("Ignoring session event {:?} in state {:?}", event, from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::mock::RecordingOutput;
    use crate::actuator::{MotorId, MotorState};
    use crate::transport::TcpTransportListener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    const OFF: MotorState = MotorState::DISABLED;

    async fn server() -> (ControlServer<TcpTransportListener, RecordingOutput>, RecordingOutput) {
        let listener = TcpTransportListener::bind("127.0.0.1:0").await.unwrap();
        let output = RecordingOutput::new();
        let server = ControlServer::new(listener, output.clone(), CommandDispatcher::default(), 64);
        (server, output)
    }

    /// Send `input` and wait for the server to close the connection
    async fn send_until_closed(stream: &mut TcpStream, input: &[u8]) {
        stream.write_all(input).await.unwrap();
        let mut buf = [0u8; 16];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
    }

    async fn wait_for_calls(output: &RecordingOutput, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while output.calls().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for motor writes");
    }

    #[tokio::test]
    async fn test_sessions_are_served_in_turn() {
        let (mut server, output) = server().await;
        let addr = server.listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let client = async move {
            let mut first = TcpStream::connect(addr).await.unwrap();
            // The trailing fwd arrives after quit and must never run
            send_until_closed(&mut first, b"fwd\nquit\nfwd\n").await;

            let mut second = TcpStream::connect(addr).await.unwrap();
            send_until_closed(&mut second, b"back\r\nquit\r\n").await;

            stop_tx.send(()).unwrap();
        };

        let (result, ()) = tokio::join!(
            server.run(async move {
                let _ = stop_rx.await;
            }),
            client
        );
        result.unwrap();

        use MotorId::*;
        let rev = MotorState::REVERSE;
        let fwd = MotorState::FORWARD;
        assert_eq!(
            output.calls(),
            vec![
                // failsafe before first accept
                (A, OFF),
                (B, OFF),
                (A, fwd),
                (B, fwd),
                // failsafe before second accept
                (A, OFF),
                (B, OFF),
                (A, rev),
                (B, rev),
                // failsafe before third accept, then on shutdown
                (A, OFF),
                (B, OFF),
                (A, OFF),
                (B, OFF),
            ]
        );
        assert_eq!(server.sessions_served(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_while_listening() {
        let (mut server, output) = server().await;
        server.run(async {}).await.unwrap();

        assert_eq!(
            output.calls(),
            vec![
                (MotorId::A, OFF),
                (MotorId::B, OFF),
                (MotorId::A, OFF),
                (MotorId::B, OFF),
            ]
        );
        assert_eq!(server.sessions_served(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_active_session() {
        let (mut server, output) = server().await;
        let addr = server.listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let probe = output.clone();
        let client = async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"left\n").await.unwrap();
            // failsafe pair plus the two writes of "left"
            wait_for_calls(&probe, 4).await;
            stop_tx.send(()).unwrap();
            stream
        };

        let (result, _stream) = tokio::join!(
            server.run(async move {
                let _ = stop_rx.await;
            }),
            client
        );
        result.unwrap();

        let calls = output.calls();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[2], (MotorId::LEFT, MotorState::REVERSE));
        assert_eq!(calls[3], (MotorId::RIGHT, MotorState::FORWARD));
        assert_eq!(&calls[4..], &[(MotorId::A, OFF), (MotorId::B, OFF)]);
        assert_eq!(server.sessions_served(), 1);
    }
}
