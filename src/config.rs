//! Server configuration
//!
//! Settings come from three layers, highest precedence first: command line
//! flags, an optional TOML file, then built-in defaults.

use crate::actuator::PinMap;
use clap::{Parser, ValueEnum};
use motorcontrol_shared::protocol::{DEFAULT_PORT, RECV_BUFFER_SIZE};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Smallest receive capacity that still fits the longest command line
pub const MIN_BUFFER_SIZE: usize = 16;

/// Errors raised while building the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which GPIO implementation drives the motors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GpioBackend {
    /// In-memory pins, logged only
    #[default]
    Simulated,
    /// Linux sysfs GPIO
    Sysfs,
}

/// Command line for the server binary
#[derive(Parser, Debug, Default)]
#[command(
    name = "motorcontrol",
    version,
    about = "Drive a two-motor chassis from line commands received over TCP"
)]
pub struct Cli {
    /// TCP port to listen on
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// GPIO backend
    #[arg(long, value_enum)]
    pub gpio: Option<GpioBackend>,

    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Receive buffer capacity in bytes (longest accepted line)
    #[arg(long)]
    pub buffer_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub gpio: GpioBackend,
    pub sysfs_root: PathBuf,
    pub buffer_size: usize,
    pub pins: PinMap,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            gpio: GpioBackend::default(),
            sysfs_root: PathBuf::from("/sys/class/gpio"),
            buffer_size: RECV_BUFFER_SIZE,
            pins: PinMap::default(),
        }
    }
}

impl ServerConfig {
    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Build the effective configuration for a parsed command line
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Override file or default values with flags that were given
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(bind) = &cli.bind {
            self.bind = bind.clone();
        }
        if let Some(gpio) = cli.gpio {
            self.gpio = gpio;
        }
        if let Some(size) = cli.buffer_size {
            self.buffer_size = size;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(ConfigError::Invalid(format!(
                "buffer_size {} is below the minimum of {}",
                self.buffer_size, MIN_BUFFER_SIZE
            )));
        }

        let pins = self.pins.all_pins();
        let distinct: BTreeSet<u8> = pins.iter().copied().collect();
        if distinct.len() != pins.len() {
            return Err(ConfigError::Invalid(format!(
                "motor pins must be distinct, got {:?}",
                pins
            )));
        }
        Ok(())
    }

    /// `host:port` string for the listener, bracketing bare IPv6 hosts
    pub fn listen_address(&self) -> String {
        if self.bind.contains(':') && !self.bind.starts_with('[') {
            format!("[{}]:{}", self.bind, self.port)
        } else {
            format!("{}:{}", self.bind, self.port)
        }
    }
}
