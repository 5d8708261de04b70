// Error types for ports and runtime startup

use crate::motor::FeetechError;

/// Failure of a single motor port operation
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Motor bus error: {0}")]
    Bus(#[from] FeetechError),

    #[error("Motor bus lock poisoned")]
    Poisoned,

    #[error("Motor {id} disconnected")]
    Disconnected { id: u8 },
}

/// Errors that stop the runtime from starting
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Motor setup failed: {0}")]
    Motor(#[from] FeetechError),

    #[error("Zenoh error: {0}")]
    Zenoh(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
