//! motorcontrol Shared Protocol Types
//!
//! This crate provides the wire constants, line codec and session state
//! machine shared between the motor control server and its remote client.

pub mod codec;
pub mod state_machine;

pub use codec::{encode_line, strip_line_endings, CodecError, LineDecoder};
pub use state_machine::{SessionEvent, SessionState, SessionStateMachine, TransitionResult};

/// Wire protocol parameters
pub mod protocol {
    /// Port the server listens on when none is given
    pub const DEFAULT_PORT: u16 = 7070;

    /// Receive buffer capacity for one command line, in bytes
    pub const RECV_BUFFER_SIZE: usize = 64;

    /// Reserved token that closes the connection
    pub const QUIT: &str = "quit";

    /// Largest argument count of any registered command
    pub const MAX_ARITY: usize = 3;
}

/// Command names understood by the server
pub mod commands {
    pub const STOP: &str = "stop";
    pub const STOP_SHORT: &str = "s";
    pub const SET_MOTOR: &str = "setm";
    pub const SET_A: &str = "seta";
    pub const SET_B: &str = "setb";
    pub const FORWARD: &str = "fwd";
    pub const BACK: &str = "back";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
}
