//! Directional drive handlers (no arguments)

use super::HandlerError;
use crate::actuator::{MotorId, MotorOutput, MotorState};

/// Handle `stop` / `s`: both motors disabled
pub fn stop(output: &mut dyn MotorOutput, _args: &[&str]) -> Result<(), HandlerError> {
    output.set_motor(MotorId::A, MotorState::DISABLED);
    output.set_motor(MotorId::B, MotorState::DISABLED);
    Ok(())
}

/// Handle `fwd`
pub fn forward(output: &mut dyn MotorOutput, _args: &[&str]) -> Result<(), HandlerError> {
    output.set_motor(MotorId::A, MotorState::FORWARD);
    output.set_motor(MotorId::B, MotorState::FORWARD);
    Ok(())
}

/// Handle `back`
pub fn back(output: &mut dyn MotorOutput, _args: &[&str]) -> Result<(), HandlerError> {
    output.set_motor(MotorId::A, MotorState::REVERSE);
    output.set_motor(MotorId::B, MotorState::REVERSE);
    Ok(())
}

/// Handle `left`: spin in place, left side backwards
pub fn left(output: &mut dyn MotorOutput, _args: &[&str]) -> Result<(), HandlerError> {
    output.set_motor(MotorId::LEFT, MotorState::REVERSE);
    output.set_motor(MotorId::RIGHT, MotorState::FORWARD);
    Ok(())
}

/// Handle `right`: spin in place, right side backwards
pub fn right(output: &mut dyn MotorOutput, _args: &[&str]) -> Result<(), HandlerError> {
    output.set_motor(MotorId::LEFT, MotorState::FORWARD);
    output.set_motor(MotorId::RIGHT, MotorState::REVERSE);
    Ok(())
}
