//! Connection State Machine
//!
//! The server alternates between waiting for a client and serving exactly one
//! client. `Active` is only ever entered from `Listening`.

/// Whether a client session is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No active session, waiting for a connection
    Listening,
    /// One client connected and being served
    Active,
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A connection was accepted
    Accepted,
    /// Client sent the quit token
    Quit,
    /// Client closed the connection
    PeerClosed,
    /// Receiving from the connection failed
    TransportError,
}

/// Result of a state transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition was valid and state changed
    Success(SessionState),
    /// Transition was invalid from current state
    Invalid {
        from: SessionState,
        event: SessionEvent,
    },
}

/// The per-server session state machine
#[derive(Debug)]
pub struct SessionStateMachine {
    current_state: SessionState,
    sessions_served: u64,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateMachine {
    /// Create a new state machine in Listening state
    pub fn new() -> Self {
        Self {
            current_state: SessionState::Listening,
            sessions_served: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.current_state
    }

    /// Number of sessions that have been accepted so far
    pub fn sessions_served(&self) -> u64 {
        self.sessions_served
    }

    /// Process an event and return the transition result
    pub fn process_event(&mut self, event: SessionEvent) -> TransitionResult {
        match self.get_next_state(&event) {
            Some(state) => {
                if state == SessionState::Active {
                    self.sessions_served += 1;
                }
                self.current_state = state;
                TransitionResult::Success(state)
            }
            None => TransitionResult::Invalid {
                from: self.current_state,
                event,
            },
        }
    }

    /// Get the next state for a given event, if the transition is valid
    fn get_next_state(&self, event: &SessionEvent) -> Option<SessionState> {
        use SessionEvent::*;
        use SessionState::*;

        match (self.current_state, event) {
            (Listening, Accepted) => Some(Active),
            (Active, Quit | PeerClosed | TransportError) => Some(Listening),
            _ => None,
        }
    }
}
