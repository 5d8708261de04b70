// Drive control for the tank base
//
// Provides:
// - Slew limiting of operator axes
// - Arcade (differential) mixing into left/right power
// - The per-tick control loop with brake override

pub mod control;
pub mod mixer;
pub mod slew;

pub use control::{ControlLoop, DriveOutput};
pub use mixer::{mix, MotorPowers};
pub use slew::apply as apply_slew;
