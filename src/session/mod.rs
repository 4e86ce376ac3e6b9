//! Session management for the command connection
//!
//! This module handles:
//! - Receiving, cleaning and dispatching lines from one client
//! - The quit token and transport failures ending a session
//! - The accept loop with its failsafe writes between sessions

mod connection;
mod server;

pub use connection::{ControlSession, SessionEnd};
pub use server::ControlServer;
