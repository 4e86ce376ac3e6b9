//! Motor control server
//!
//! Receives newline-terminated text commands from one TCP client at a time
//! and turns them into enable/direction writes on an L293D motor driver.

pub mod actuator;
pub mod command;
pub mod config;
pub mod session;
pub mod shutdown;
pub mod transport;
