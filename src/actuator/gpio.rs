//! GPIO sink abstraction and backends

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error};

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// Digital output level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Something that can configure and drive digital output pins
pub trait GpioSink: Send {
    /// Configure a pin's direction. Only called during startup.
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<()>;

    /// Drive a pin to the given level
    fn write_pin(&mut self, pin: u8, level: Level);

    /// Apply several writes as one logical operation, in order
    fn write_pins(&mut self, writes: &[(u8, Level)]) {
        for &(pin, level) in writes {
            self.write_pin(pin, level);
        }
    }
}

/// In-memory GPIO used off-target and in tests
#[derive(Debug, Default)]
pub struct SimulatedGpio {
    modes: BTreeMap<u8, PinMode>,
    levels: BTreeMap<u8, Level>,
    /// Every batch applied through `write_pins`, oldest first
    batches: Vec<Vec<(u8, Level)>>,
}

impl SimulatedGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of a pin, `None` if it was never written
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.levels.get(&pin).copied()
    }

    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.modes.get(&pin).copied()
    }

    pub fn batches(&self) -> &[Vec<(u8, Level)>] {
        &self.batches
    }
}

impl GpioSink for SimulatedGpio {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        debug!("[GPIO] pin {} -> {:?}", pin, mode);
        self.modes.insert(pin, mode);
        Ok(())
    }

    fn write_pin(&mut self, pin: u8, level: Level) {
        debug!("[GPIO] pin {} = {:?}", pin, level);
        self.levels.insert(pin, level);
    }

    fn write_pins(&mut self, writes: &[(u8, Level)]) {
        for &(pin, level) in writes {
            self.write_pin(pin, level);
        }
        self.batches.push(writes.to_vec());
    }
}

/// Linux sysfs GPIO (`/sys/class/gpio`), pins are kernel GPIO numbers
#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new("/sys/class/gpio")
    }
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pin_dir(&self, pin: u8) -> PathBuf {
        self.root.join(format!("gpio{}", pin))
    }
}

impl GpioSink for SysfsGpio {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let dir = self.pin_dir(pin);
        if !dir.exists() {
            fs::write(self.root.join("export"), pin.to_string())
                .with_context(|| format!("exporting GPIO {}", pin))?;
        }

        let direction = match mode {
            PinMode::Input => "in",
            PinMode::Output => "out",
        };
        fs::write(dir.join("direction"), direction)
            .with_context(|| format!("setting GPIO {} direction to {}", pin, direction))?;
        Ok(())
    }

    fn write_pin(&mut self, pin: u8, level: Level) {
        let value = match level {
            Level::Low => "0",
            Level::High => "1",
        };
        // Write failures are hardware faults; report them and keep serving.
        if let Err(e) = fs::write(self.pin_dir(pin).join("value"), value) {
            error!("[GPIO] failed to write GPIO {}: {}", pin, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
    }

    #[test]
    fn test_simulated_records_batches() {
        let mut gpio = SimulatedGpio::new();
        gpio.configure_pin(3, PinMode::Output).unwrap();
        gpio.write_pins(&[(3, Level::High), (4, Level::Low)]);

        assert_eq!(gpio.mode(3), Some(PinMode::Output));
        assert_eq!(gpio.level(3), Some(Level::High));
        assert_eq!(gpio.level(4), Some(Level::Low));
        assert_eq!(gpio.level(5), None);
        assert_eq!(gpio.batches().len(), 1);
    }

    #[test]
    fn test_sysfs_writes_value_files() {
        let root = tempfile::tempdir().unwrap();
        // Pretend the pin is already exported
        fs::create_dir(root.path().join("gpio17")).unwrap();

        let mut gpio = SysfsGpio::new(root.path());
        gpio.configure_pin(17, PinMode::Output).unwrap();
        gpio.write_pin(17, Level::High);

        let direction = fs::read_to_string(root.path().join("gpio17/direction")).unwrap();
        let value = fs::read_to_string(root.path().join("gpio17/value")).unwrap();
        assert_eq!(direction, "out");
        assert_eq!(value, "1");
    }

    #[test]
    fn test_sysfs_exports_missing_pin() {
        let root = tempfile::tempdir().unwrap();
        let mut gpio = SysfsGpio::new(root.path());

        // The fake sysfs never creates gpio22/, so setting direction fails
        // after the export request has been written.
        assert!(gpio.configure_pin(22, PinMode::Output).is_err());
        let export = fs::read_to_string(root.path().join("export")).unwrap();
        assert_eq!(export, "22");
    }
}
