//! Fixed command table

use super::handlers::{self, HandlerError};
use crate::actuator::MotorOutput;
use motorcontrol_shared::{commands, protocol::MAX_ARITY};

/// Which handler a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Stop,
    SetMotor,
    SetA,
    SetB,
    Forward,
    Back,
    Left,
    Right,
}

impl CommandKind {
    /// Run the handler for this command with already-collected arguments
    pub fn execute(self, output: &mut dyn MotorOutput, args: &[&str]) -> Result<(), HandlerError> {
        match self {
            CommandKind::Stop => handlers::stop(output, args),
            CommandKind::SetMotor => handlers::set_motor(output, args),
            CommandKind::SetA => handlers::set_a(output, args),
            CommandKind::SetB => handlers::set_b(output, args),
            CommandKind::Forward => handlers::forward(output, args),
            CommandKind::Back => handlers::back(output, args),
            CommandKind::Left => handlers::left(output, args),
            CommandKind::Right => handlers::right(output, args),
        }
    }
}

/// One row of the command table
#[derive(Debug, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: &'static str,
    pub arity: usize,
    pub kind: CommandKind,
}

const fn entry(name: &'static str, arity: usize, kind: CommandKind) -> CommandEntry {
    CommandEntry { name, arity, kind }
}

const COMMAND_TABLE: [CommandEntry; 9] = [
    entry(commands::STOP, 0, CommandKind::Stop),
    entry(commands::STOP_SHORT, 0, CommandKind::Stop),
    entry(commands::SET_MOTOR, 3, CommandKind::SetMotor),
    entry(commands::SET_A, 2, CommandKind::SetA),
    entry(commands::SET_B, 2, CommandKind::SetB),
    entry(commands::FORWARD, 0, CommandKind::Forward),
    entry(commands::BACK, 0, CommandKind::Back),
    entry(commands::LEFT, 0, CommandKind::Left),
    entry(commands::RIGHT, 0, CommandKind::Right),
];

// Arguments are collected into a [&str; MAX_ARITY].
const _: () = {
    let mut i = 0;
    while i < COMMAND_TABLE.len() {
        assert!(COMMAND_TABLE[i].arity <= MAX_ARITY);
        i += 1;
    }
};

/// Every command the server understands, in lookup order
pub static COMMANDS: [CommandEntry; 9] = COMMAND_TABLE;

/// Immutable view over a command table
#[derive(Debug, Clone, Copy)]
pub struct CommandRegistry {
    entries: &'static [CommandEntry],
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRegistry {
    /// The built-in command table
    pub fn standard() -> Self {
        Self { entries: &COMMANDS }
    }

    /// Exact, case-sensitive lookup; the first matching entry wins
    pub fn lookup(&self, name: &str) -> Option<&'static CommandEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &'static [CommandEntry] {
        self.entries
    }
}
