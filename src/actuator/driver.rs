//! Motor driver for an L293D dual H-bridge
//!
//! Each motor uses three lines: enable, forward input and reverse input.
//! A motor's three lines are always written together as one batch.

use super::gpio::{GpioSink, Level, PinMode};
use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info};

/// Motor identifier, fixed by wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorId {
    A,
    B,
}

impl MotorId {
    /// Left side of the chassis
    pub const LEFT: MotorId = MotorId::B;
    /// Right side of the chassis
    pub const RIGHT: MotorId = MotorId::A;

    pub const ALL: [MotorId; 2] = [MotorId::A, MotorId::B];

    fn index(self) -> usize {
        match self {
            MotorId::A => 0,
            MotorId::B => 1,
        }
    }
}

/// Desired state of one motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorState {
    pub enabled: bool,
    pub reverse: bool,
}

impl MotorState {
    pub const DISABLED: MotorState = MotorState {
        enabled: false,
        reverse: false,
    };
    pub const FORWARD: MotorState = MotorState {
        enabled: true,
        reverse: false,
    };
    pub const REVERSE: MotorState = MotorState {
        enabled: true,
        reverse: true,
    };

    pub fn new(enabled: bool, reverse: bool) -> Self {
        Self { enabled, reverse }
    }

    /// Levels for (enable, forward, reverse). A disabled motor drives all
    /// three lines low.
    pub fn levels(&self) -> (Level, Level, Level) {
        if self.enabled {
            (Level::High, Level::from(!self.reverse), Level::from(self.reverse))
        } else {
            (Level::Low, Level::Low, Level::Low)
        }
    }
}

/// GPIO lines belonging to one motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MotorPins {
    pub enable: u8,
    pub forward: u8,
    pub reverse: u8,
}

/// Pin assignment for both motors (kernel GPIO numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PinMap {
    pub motor_a: MotorPins,
    pub motor_b: MotorPins,
}

impl Default for PinMap {
    /// Raspberry Pi header pins 11/13/15 (motor A) and 12/16/18 (motor B)
    fn default() -> Self {
        Self {
            motor_a: MotorPins {
                enable: 17,
                forward: 27,
                reverse: 22,
            },
            motor_b: MotorPins {
                enable: 18,
                forward: 23,
                reverse: 24,
            },
        }
    }
}

impl PinMap {
    pub fn pins(&self, id: MotorId) -> MotorPins {
        match id {
            MotorId::A => self.motor_a,
            MotorId::B => self.motor_b,
        }
    }

    /// Every output line, motor A first
    pub fn all_pins(&self) -> [u8; 6] {
        let (a, b) = (self.motor_a, self.motor_b);
        [a.enable, b.enable, a.forward, a.reverse, b.forward, b.reverse]
    }
}

/// Anything that can apply motor states
pub trait MotorOutput {
    /// Apply `state` to motor `id` as one atomic operation
    fn set_motor(&mut self, id: MotorId, state: MotorState);

    /// Failsafe write: every motor disabled
    fn disable_all(&mut self) {
        for id in MotorId::ALL {
            self.set_motor(id, MotorState::DISABLED);
        }
    }
}

/// Drives the motors through a GPIO sink
pub struct ActuatorDriver<G: GpioSink> {
    gpio: G,
    pins: PinMap,
    states: [MotorState; 2],
}

impl<G: GpioSink> ActuatorDriver<G> {
    pub fn new(gpio: G, pins: PinMap) -> Self {
        Self {
            gpio,
            pins,
            states: [MotorState::DISABLED; 2],
        }
    }

    /// Configure every motor line as an output and force the failsafe state
    pub fn configure(&mut self) -> Result<()> {
        for pin in self.pins.all_pins() {
            self.gpio.configure_pin(pin, PinMode::Output)?;
        }
        self.disable_all();
        info!("Configured motor outputs {:?}", self.pins.all_pins());
        Ok(())
    }

    /// Last state applied to a motor
    pub fn state(&self, id: MotorId) -> MotorState {
        self.states[id.index()]
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }
}

impl<G: GpioSink> MotorOutput for ActuatorDriver<G> {
    fn set_motor(&mut self, id: MotorId, state: MotorState) {
        let pins = self.pins.pins(id);
        let (enable, forward, reverse) = state.levels();

        // Lower lines before raising any, so both direction inputs are never
        // high at the same time.
        let mut writes = [
            (pins.enable, enable),
            (pins.forward, forward),
            (pins.reverse, reverse),
        ];
        writes.sort_by_key(|&(_, level)| level == Level::High);

        self.gpio.write_pins(&writes);
        self.states[id.index()] = state;
        debug!(
            "Motor {:?}: enabled={} reverse={}",
            id, state.enabled, state.reverse
        );
    }
}
