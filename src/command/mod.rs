//! Command table and dispatch
//!
//! This module handles:
//! - The fixed table of command names, arities and handlers
//! - Tokenizing a received line and checking its arity
//! - Running the handler and reporting a numeric result code

mod dispatcher;
pub mod handlers;
mod registry;

pub use dispatcher::{result_code, CommandDispatcher, CommandResult, DispatchError};
pub use handlers::HandlerError;
pub use registry::{CommandEntry, CommandKind, CommandRegistry, COMMANDS};
