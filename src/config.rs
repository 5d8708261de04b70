// Timeouts, topics, motor wiring and tunables
use std::time::Duration;

use clap::Parser;

use crate::error::RuntimeError;

// Drive loop period (50 Hz)
pub const TICK_MS: u64 = 20;

// Thermal poll period
pub const POLL_MS: u64 = 250;

// Operator command timeout for watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_OPERATOR: &str = "tankdrive/cmd/operator"; // operator joystick

// Serial port for the Feetech motor bus
pub const MOTOR_PORT: &str = "/dev/ttyUSB0";

// Motor wiring as (id, reversed)
pub const LEFT_MOTORS: [(u8, bool); 2] = [(11, true), (12, false)];
pub const RIGHT_MOTORS: [(u8, bool); 2] = [(1, false), (2, true)];

// Motors watched by the thermal monitor
pub const THERMAL_MOTORS: [u8; 4] = [1, 2, 3, 4];

// Joystick analog full scale
pub const MAX_POWER: f32 = 127.0;

/// Tunables for the drive control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveConfig {
    /// Largest change of the drive axis per tick
    pub drive_max_delta: f32,
    /// Largest change of the turn axis per tick
    pub turn_max_delta: f32,
    /// Scale applied to raw turn input before slewing
    pub turn_sensitivity: f32,
    pub tick_period: Duration,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            drive_max_delta: 8.0,
            turn_max_delta: 16.0,
            turn_sensitivity: 1.0,
            tick_period: Duration::from_millis(TICK_MS),
        }
    }
}

/// Thresholds and gauge range for the thermal monitor.
///
/// `thresholds` are the Celsius lower bounds of Warm, Hot and Critical.
/// `display_range` is the Kelvin span of the gauge needle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalConfig {
    pub thresholds: [f64; 3],
    pub display_range: [f64; 2],
    pub poll_period: Duration,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            thresholds: [45.0, 55.0, 65.0],
            display_range: [293.15, 353.15],
            poll_period: Duration::from_millis(POLL_MS),
        }
    }
}

/// Command line arguments for the runtime
#[derive(Debug, Parser)]
#[command(name = "tankdrive-runtime", about = "Slewed tank drive with motor thermal monitor")]
pub struct Args {
    /// Serial port of the Feetech motor bus
    #[arg(long, default_value = MOTOR_PORT)]
    pub port: String,

    /// Run against simulated motors instead of hardware
    #[arg(long)]
    pub simulate: bool,

    /// Drive slew, units per tick
    #[arg(long, default_value_t = 8.0)]
    pub drive_rate: f32,

    /// Turn slew, units per tick
    #[arg(long, default_value_t = 16.0)]
    pub turn_rate: f32,

    /// Scale applied to turn input (0.6 for a gentler turn)
    #[arg(long, default_value_t = 1.0)]
    pub turn_sensitivity: f32,

    /// Drive loop period in milliseconds
    #[arg(long, default_value_t = TICK_MS)]
    pub tick_ms: u64,

    /// Thermal poll period in milliseconds
    #[arg(long, default_value_t = POLL_MS)]
    pub poll_ms: u64,
}

/// Everything the runtime needs to start
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub port: String,
    pub simulate: bool,
    pub drive: DriveConfig,
    pub thermal: ThermalConfig,
}

impl TryFrom<Args> for RuntimeConfig {
    type Error = RuntimeError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.tick_ms == 0 || args.poll_ms == 0 {
            return Err(RuntimeError::Config("loop periods must be non-zero".into()));
        }
        // A non-positive rate freezes the axis, which is never what an operator wants
        if !(args.drive_rate > 0.0 && args.turn_rate > 0.0) {
            return Err(RuntimeError::Config(format!(
                "slew rates must be positive (drive={}, turn={})",
                args.drive_rate, args.turn_rate
            )));
        }

        Ok(Self {
            port: args.port,
            simulate: args.simulate,
            drive: DriveConfig {
                drive_max_delta: args.drive_rate,
                turn_max_delta: args.turn_rate,
                turn_sensitivity: args.turn_sensitivity,
                tick_period: Duration::from_millis(args.tick_ms),
            },
            thermal: ThermalConfig {
                poll_period: Duration::from_millis(args.poll_ms),
                ..ThermalConfig::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_match_default_configs() {
        let args = Args::parse_from(["tankdrive-runtime"]);
        let config = RuntimeConfig::try_from(args).unwrap();
        assert_eq!(config.drive, DriveConfig::default());
        assert_eq!(config.thermal, ThermalConfig::default());
        assert!(!config.simulate);
    }

    #[test]
    fn test_tuned_variant_from_flags() {
        let args = Args::parse_from([
            "tankdrive-runtime",
            "--simulate",
            "--drive-rate",
            "6",
            "--turn-rate",
            "12",
            "--turn-sensitivity",
            "0.6",
        ]);
        let config = RuntimeConfig::try_from(args).unwrap();
        assert!(config.simulate);
        assert_eq!(config.drive.drive_max_delta, 6.0);
        assert_eq!(config.drive.turn_max_delta, 12.0);
        assert_eq!(config.drive.turn_sensitivity, 0.6);
    }

    #[test]
    fn test_rejects_zero_rate() {
        let args = Args::parse_from(["tankdrive-runtime", "--drive-rate", "0"]);
        assert!(matches!(
            RuntimeConfig::try_from(args),
            Err(RuntimeError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_zero_period() {
        let args = Args::parse_from(["tankdrive-runtime", "--poll-ms", "0"]);
        assert!(RuntimeConfig::try_from(args).is_err());
    }
}
