//! Command handlers
//!
//! Every handler has the same shape: it receives the motor output and exactly
//! as many arguments as its table entry declares, validates all of them, and
//! only then writes to the motors.

mod drive;
mod motor;

pub use drive::{back, forward, left, right, stop};
pub use motor::{set_a, set_b, set_motor};

use thiserror::Error;

/// Argument validation failures, numbered by the argument that failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Invalid motor \"{0}\" (expected A, B, L or R)")]
    InvalidMotor(String),

    #[error("Invalid state \"{0}\" (expected 0 or 1)")]
    InvalidState(String),

    #[error("Invalid reverse flag \"{0}\" (expected 0 or 1)")]
    InvalidReverse(String),
}

impl HandlerError {
    /// Positive result code reported for this failure
    pub fn code(&self) -> i32 {
        match self {
            HandlerError::InvalidMotor(_) => 1,
            HandlerError::InvalidState(_) => 2,
            HandlerError::InvalidReverse(_) => 3,
        }
    }
}
