// Motor hardware for the tank base
//
// Provides:
// - Feetech STS serial protocol (velocity goals, temperature reads)
// - Drive sides (`MotorGroup`) and temperature sensors (`MotorProbe`) on a shared bus

pub mod feetech;
mod group;

pub use feetech::{FeetechBus, FeetechError};
pub use group::{
    power_to_raw, shared, MotorGroup, MotorProbe, SharedBus, MAX_RAW_VELOCITY,
    SILENT_RETRY_POLLS,
};
