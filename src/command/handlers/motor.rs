//! Explicit per-motor handlers: `setm`, `seta`, `setb`

use super::HandlerError;
use crate::actuator::{MotorId, MotorOutput, MotorState};

/// Resolve a motor selector token
fn parse_motor(token: &str) -> Option<MotorId> {
    match token {
        "A" | "a" => Some(MotorId::A),
        "B" | "b" => Some(MotorId::B),
        "L" | "l" => Some(MotorId::LEFT),
        "R" | "r" => Some(MotorId::RIGHT),
        _ => None,
    }
}

fn parse_flag(token: &str) -> Option<bool> {
    match token {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

/// Handle `setm <motor> <state> <reverse>`
///
/// The selector is read from the first argument only.
pub fn set_motor(output: &mut dyn MotorOutput, args: &[&str]) -> Result<(), HandlerError> {
    let arg = |i: usize| args.get(i).copied().unwrap_or_default();

    let id = parse_motor(arg(0)).ok_or_else(|| HandlerError::InvalidMotor(arg(0).into()))?;
    let enabled = parse_flag(arg(1)).ok_or_else(|| HandlerError::InvalidState(arg(1).into()))?;
    let reverse = parse_flag(arg(2)).ok_or_else(|| HandlerError::InvalidReverse(arg(2).into()))?;

    output.set_motor(id, MotorState::new(enabled, reverse));
    Ok(())
}

/// Handle `seta <state> <reverse>`
pub fn set_a(output: &mut dyn MotorOutput, args: &[&str]) -> Result<(), HandlerError> {
    set_fixed(output, "A", args)
}

/// Handle `setb <state> <reverse>`
pub fn set_b(output: &mut dyn MotorOutput, args: &[&str]) -> Result<(), HandlerError> {
    set_fixed(output, "B", args)
}

fn set_fixed(output: &mut dyn MotorOutput, motor: &str, args: &[&str]) -> Result<(), HandlerError> {
    let state = args.first().copied().unwrap_or_default();
    let reverse = args.get(1).copied().unwrap_or_default();
    set_motor(output, &[motor, state, reverse])
}
