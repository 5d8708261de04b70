// Arcade mixing for a differential (tank) base

/// Left/right power for the two sides of the base
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorPowers {
    pub left: f32,
    pub right: f32,
}

impl MotorPowers {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Mix forward and turn into side powers: left = drive + turn, right = drive - turn.
///
/// The result is not normalized. With |drive| + |turn| above the motor range
/// one side saturates at the port and the turn radius widens.
pub fn mix(drive: f32, turn: f32) -> MotorPowers {
    MotorPowers {
        left: drive + turn,
        right: drive - turn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_mix() {
        assert_eq!(mix(50.0, 20.0), MotorPowers::new(70.0, 30.0));
        assert_eq!(mix(-40.0, 10.0), MotorPowers::new(-30.0, -50.0));
    }

    #[test]
    fn test_straight_and_spin() {
        assert_eq!(mix(63.0, 0.0), MotorPowers::new(63.0, 63.0));
        assert_eq!(mix(0.0, 45.0), MotorPowers::new(45.0, -45.0));
        assert_eq!(mix(0.0, 0.0), MotorPowers::zero());
    }

    #[test]
    fn test_no_clamping() {
        // Saturation is the port's concern
        let p = mix(127.0, 127.0);
        assert_eq!(p.left, 254.0);
        assert_eq!(p.right, 0.0);
    }
}
