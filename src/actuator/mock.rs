//! Recording motor output for tests

use super::{MotorId, MotorOutput, MotorState};
use std::sync::{Arc, Mutex};

/// Records every `set_motor` call; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    calls: Arc<Mutex<Vec<(MotorId, MotorState)>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(MotorId, MotorState)> {
        self.calls.lock().unwrap().clone()
    }
}

impl MotorOutput for RecordingOutput {
    fn set_motor(&mut self, id: MotorId, state: MotorState) {
        self.calls.lock().unwrap().push((id, state));
    }
}
