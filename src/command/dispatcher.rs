//! Command dispatcher - tokenizes a line and runs the matching handler

use super::handlers::HandlerError;
use super::registry::{CommandEntry, CommandRegistry};
use crate::actuator::MotorOutput;
use motorcontrol_shared::protocol::MAX_ARITY;
use thiserror::Error;

/// Why a line could not be executed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),

    #[error("Not enough arguments: {name} takes {expected}, got {given}")]
    MissingArguments {
        name: &'static str,
        expected: usize,
        given: usize,
    },

    #[error("Couldn't execute command: {0}")]
    Handler(#[from] HandlerError),
}

impl DispatchError {
    /// Numeric result code: -1 unknown, -2 missing arguments, positive for
    /// handler validation failures
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::UnknownCommand(_) => -1,
            DispatchError::MissingArguments { .. } => -2,
            DispatchError::Handler(e) => e.code(),
        }
    }
}

/// Outcome of dispatching one line
pub type CommandResult = Result<&'static CommandEntry, DispatchError>;

/// Numeric form of a dispatch outcome, 0 on success
pub fn result_code(result: &CommandResult) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}

/// Resolves command lines against a registry
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandDispatcher {
    registry: CommandRegistry,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parse `line` and run the command it names
    ///
    /// Tokens are separated by any whitespace. Tokens beyond the command's
    /// arity are ignored.
    pub fn dispatch(&self, output: &mut dyn MotorOutput, line: &str) -> CommandResult {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();

        let entry = self
            .registry
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;

        let mut args = [""; MAX_ARITY];
        for (given, slot) in args.iter_mut().take(entry.arity).enumerate() {
            *slot = tokens.next().ok_or(DispatchError::MissingArguments {
                name: entry.name,
                expected: entry.arity,
                given,
            })?;
        }

        entry.kind.execute(output, &args[..entry.arity])?;
        Ok(entry)
    }
}
