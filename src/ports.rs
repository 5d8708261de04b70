// Port traits between the control core and the outside world
//
// The drive loop and the thermal monitor only ever talk to hardware,
// operators and screens through these traits. Adapters live in
// `motor` (Feetech bus), `sim` (in-memory), `display` and `runtime`.

use crate::error::PortError;
use crate::thermal::AlarmLevel;

/// A motor (or group of motors driven as one) that accepts signed power
pub trait MotorOutput {
    /// Command a signed power. Values outside the port's range are clamped by the port.
    fn move_power(&mut self, power: f32) -> Result<(), PortError>;

    /// Actively stop and hold
    fn brake(&mut self) -> Result<(), PortError>;
}

/// A motor's internal temperature sensor
pub trait TemperatureSensor {
    /// Degrees Celsius. NaN (or any non-finite value) means no data.
    fn read_temperature_celsius(&mut self) -> f64;
}

/// Operator analog axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left stick Y: forward/back
    Drive,
    /// Right stick X: rotation
    Turn,
}

/// Operator digital buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Brake,
}

/// Joystick-like operator input
pub trait OperatorInput {
    fn analog(&self, axis: Axis) -> f32;
    fn digital(&self, button: Button) -> bool;
}

/// Consumer of classified thermal results, addressed by slot id
pub trait DisplaySink {
    fn update_slot(&mut self, id: usize, level: AlarmLevel, kelvin: Option<f64>);
}

impl<T: MotorOutput + ?Sized> MotorOutput for Box<T> {
    fn move_power(&mut self, power: f32) -> Result<(), PortError> {
        (**self).move_power(power)
    }

    fn brake(&mut self) -> Result<(), PortError> {
        (**self).brake()
    }
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for Box<T> {
    fn read_temperature_celsius(&mut self) -> f64 {
        (**self).read_temperature_celsius()
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn update_slot(&mut self, id: usize, level: AlarmLevel, kelvin: Option<f64>) {
        (**self).update_slot(id, level, kelvin)
    }
}
