// Message types for the runtime

use serde::{Deserialize, Serialize};

// Operator joystick state from teleop -> runtime
// Analog values use joystick scale (-127..127); brake is the held brake button
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorCommand {
    pub drive: f32,
    pub turn: f32,
    #[serde(default)]
    pub brake: bool,
}

/// Operator link health
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let cmd: OperatorCommand =
            serde_json::from_str(r#"{"drive": 100.0, "turn": -20.5, "brake": true}"#).unwrap();
        assert_eq!(
            cmd,
            OperatorCommand {
                drive: 100.0,
                turn: -20.5,
                brake: true
            }
        );
    }

    #[test]
    fn test_brake_defaults_to_released() {
        let cmd: OperatorCommand = serde_json::from_str(r#"{"drive": 0, "turn": 5}"#).unwrap();
        assert!(!cmd.brake);
    }

    #[test]
    fn test_missing_axis_is_rejected() {
        assert!(serde_json::from_str::<OperatorCommand>(r#"{"drive": 1.0}"#).is_err());
    }

    #[test]
    fn test_health_wire_names() {
        assert_eq!(
            serde_json::to_string(&RuntimeHealth::CmdStale).unwrap(),
            r#""cmd_stale""#
        );
    }
}
