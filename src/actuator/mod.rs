//! Actuator layer
//!
//! This module handles:
//! - The GPIO sink abstraction and its simulated and sysfs backends
//! - Mapping motor states onto enable/direction lines
//! - The failsafe write that disables every motor

mod driver;
pub mod gpio;

pub use driver::{ActuatorDriver, MotorId, MotorOutput, MotorPins, MotorState, PinMap};
pub use gpio::{GpioSink, Level, PinMode, SimulatedGpio, SysfsGpio};

#[cfg(test)]
pub mod mock;
