// In-memory motors, sensors and sticks for `--simulate` runs and tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::PortError;
use crate::ports::{Axis, Button, MotorOutput, OperatorInput, TemperatureSensor};

#[derive(Debug, Default)]
struct SimMotorState {
    last_power: Option<f32>,
    braked: bool,
    brake_count: usize,
    disconnected: bool,
}

/// Simulated motor side. Clones share the same state, so a clone can be
/// kept as a view while the original is moved into a loop.
#[derive(Debug, Clone, Default)]
pub struct SimMotor {
    state: Arc<Mutex<SimMotorState>>,
}

impl SimMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unplug or reconnect. While unplugged every command fails.
    pub fn set_connected(&mut self, connected: bool) {
        self.lock().disconnected = !connected;
    }

    /// Last power accepted, if any
    pub fn last_power(&self) -> Option<f32> {
        self.lock().last_power
    }

    pub fn is_braked(&self) -> bool {
        self.lock().braked
    }

    pub fn brake_count(&self) -> usize {
        self.lock().brake_count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimMotorState> {
        // Only this module touches the state and nothing panics while holding it
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MotorOutput for SimMotor {
    fn move_power(&mut self, power: f32) -> Result<(), PortError> {
        let mut state = self.lock();
        if state.disconnected {
            return Err(PortError::Disconnected { id: 0 });
        }
        state.last_power = Some(power);
        state.braked = false;
        Ok(())
    }

    fn brake(&mut self) -> Result<(), PortError> {
        let mut state = self.lock();
        if state.disconnected {
            return Err(PortError::Disconnected { id: 0 });
        }
        state.last_power = Some(0.0);
        state.braked = true;
        state.brake_count += 1;
        Ok(())
    }
}

/// Simulated temperature sensor.
///
/// Plays back a script of readings, then repeats the last one forever.
/// NaN in the script models an unplugged motor.
#[derive(Debug, Clone)]
pub struct SimThermal {
    script: VecDeque<f64>,
    last: f64,
}

impl SimThermal {
    /// Sensor that always reads `celsius`
    pub fn constant(celsius: f64) -> Self {
        Self {
            script: VecDeque::new(),
            last: celsius,
        }
    }

    /// Sensor that never has data
    pub fn unplugged() -> Self {
        Self::constant(f64::NAN)
    }

    /// Sensor that reads `readings` in order, then holds the last one
    pub fn scripted(readings: impl IntoIterator<Item = f64>) -> Self {
        let script: VecDeque<f64> = readings.into_iter().collect();
        let last = script.back().copied().unwrap_or(f64::NAN);
        Self { script, last }
    }
}

impl TemperatureSensor for SimThermal {
    fn read_temperature_celsius(&mut self) -> f64 {
        self.script.pop_front().unwrap_or(self.last)
    }
}

/// Fixed operator stick state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickInput {
    pub drive: f32,
    pub turn: f32,
    pub brake: bool,
}

impl StickInput {
    pub fn new(drive: f32, turn: f32, brake: bool) -> Self {
        Self { drive, turn, brake }
    }
}

impl OperatorInput for StickInput {
    fn analog(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Drive => self.drive,
            Axis::Turn => self.turn,
        }
    }

    fn digital(&self, button: Button) -> bool {
        match button {
            Button::Brake => self.brake,
        }
    }
}
