// Drive sides and temperature sensors on a shared Feetech bus
//
// Both loops talk to the same serial bus, so it sits behind a mutex here at
// the port layer. The control core never sees the lock.

use std::io::{Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use serialport::SerialPort;
use tracing::{debug, info, warn};

use super::feetech::{FeetechBus, FeetechError, OperatingMode, Register};
use crate::config::MAX_POWER;
use crate::error::PortError;
use crate::ports::{MotorOutput, TemperatureSensor};

/// Raw goal velocity sent for full power
pub const MAX_RAW_VELOCITY: i16 = 3000;

pub type SharedBus<T = Box<dyn SerialPort>> = Arc<Mutex<FeetechBus<T>>>;

pub fn shared<T>(bus: FeetechBus<T>) -> SharedBus<T> {
    Arc::new(Mutex::new(bus))
}

fn lock<T>(bus: &SharedBus<T>) -> Result<MutexGuard<'_, FeetechBus<T>>, PortError> {
    bus.lock().map_err(|_| PortError::Poisoned)
}

/// Convert joystick-scale power to a raw goal velocity. Clamps to ±MAX_POWER.
pub fn power_to_raw(power: f32) -> i16 {
    let clamped = power.clamp(-MAX_POWER, MAX_POWER);
    (clamped / MAX_POWER * MAX_RAW_VELOCITY as f32).round() as i16
}

/// One side of the drive: several motors commanded as one.
/// Each member is `(id, reversed)`.
pub struct MotorGroup<T: Read + Write = Box<dyn SerialPort>> {
    bus: SharedBus<T>,
    members: Vec<(u8, bool)>,
}

impl<T: Read + Write> MotorGroup<T> {
    pub fn new(bus: SharedBus<T>, members: &[(u8, bool)]) -> Self {
        Self {
            bus,
            members: members.to_vec(),
        }
    }

    pub fn ids(&self) -> Vec<u8> {
        self.members.iter().map(|&(id, _)| id).collect()
    }

    /// Ping every member and switch it to velocity mode.
    /// Fails if any member does not answer.
    pub fn initialize(&mut self) -> Result<(), FeetechError> {
        info!("Initializing motors {:?} for velocity control", self.ids());
        let mut bus = self.bus.lock().map_err(|_| FeetechError::InvalidResponse {
            id: 0,
            reason: "bus lock poisoned".to_string(),
        })?;

        for &(id, _) in &self.members {
            if !bus.ping(id)? {
                warn!("Motor {} not responding to ping", id);
                return Err(FeetechError::Timeout { id });
            }
            debug!("Motor {} responding", id);
        }
        // Mode can only change with torque off
        for &(id, _) in &self.members {
            bus.set_torque(id, false)?;
            bus.set_operating_mode(id, OperatingMode::Velocity)?;
            bus.set_torque(id, true)?;
        }
        Ok(())
    }

    fn write_raw(&mut self, raw: i16) -> Result<(), PortError> {
        let data: Vec<(u8, i16)> = self
            .members
            .iter()
            .map(|&(id, reversed)| (id, if reversed { -raw } else { raw }))
            .collect();
        lock(&self.bus)?.sync_write_i16(Register::GoalVelocity, &data)?;
        Ok(())
    }
}

impl<T: Read + Write> MotorOutput for MotorGroup<T> {
    fn move_power(&mut self, power: f32) -> Result<(), PortError> {
        self.write_raw(power_to_raw(power))
    }

    /// Zero goal velocity; in velocity mode the servo holds position
    fn brake(&mut self) -> Result<(), PortError> {
        self.write_raw(0)
    }
}

impl<T: Read + Write> Drop for MotorGroup<T> {
    fn drop(&mut self) {
        if let Err(e) = self.brake() {
            warn!("Failed to stop motors {:?} on drop: {}", self.ids(), e);
        }
    }
}

/// Polls a silent motor is left alone before it is tried again (10 s at 250 ms)
pub const SILENT_RETRY_POLLS: u32 = 40;

/// Temperature sensor of one motor on the bus.
///
/// The drive shares this bus, so a temperature read never waits for it: a
/// busy bus reads as no data. A motor that times out is left alone for `SILENT_RETRY_POLLS`
/// polls so a missing motor cannot keep the bus tied up in serial timeouts.
pub struct MotorProbe<T: Read + Write = Box<dyn SerialPort>> {
    bus: SharedBus<T>,
    id: u8,
    skip_polls: u32,
}

impl<T: Read + Write> MotorProbe<T> {
    pub fn new(bus: SharedBus<T>, id: u8) -> Self {
        Self {
            bus,
            id,
            skip_polls: 0,
        }
    }

    /// Ping the motor once at startup; a silent motor starts out skipped
    pub fn connect(bus: SharedBus<T>, id: u8) -> Self {
        let present = lock(&bus)
            .and_then(|mut bus| Ok(bus.ping(id)?))
            .unwrap_or(false);
        let mut sensor = Self::new(bus, id);
        if !present {
            warn!("Thermal motor {} not responding, reporting no data", id);
            sensor.skip_polls = SILENT_RETRY_POLLS;
        }
        sensor
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// True while the motor is being left alone after a timeout
    pub fn is_backing_off(&self) -> bool {
        self.skip_polls > 0
    }
}

impl<T: Read + Write> TemperatureSensor for MotorProbe<T> {
    /// Any bus failure, or a busy bus, reads as no data
    fn read_temperature_celsius(&mut self) -> f64 {
        if self.skip_polls > 0 {
            self.skip_polls -= 1;
            return f64::NAN;
        }

        let mut bus = match self.bus.try_lock() {
            Ok(bus) => bus,
            Err(TryLockError::WouldBlock) => {
                debug!("Bus busy, skipping temperature of motor {}", self.id);
                return f64::NAN;
            }
            Err(TryLockError::Poisoned(_)) => return f64::NAN,
        };

        match bus.read_temperature(self.id) {
            Ok(celsius) => celsius as f64,
            Err(FeetechError::Timeout { id }) => {
                debug!("Motor {} silent, retrying in {} polls", id, SILENT_RETRY_POLLS);
                self.skip_polls = SILENT_RETRY_POLLS;
                f64::NAN
            }
            Err(e) => {
                debug!("No temperature from motor {}: {}", self.id, e);
                f64::NAN
            }
        }
    }
}
