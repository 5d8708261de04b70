// Motor thermal monitoring
//
// Provides:
// - Temperature to alarm level classification (Celsius thresholds, Kelvin display)
// - A periodic monitor that polls sensors and feeds a display sink

pub mod classifier;
pub mod monitor;

pub use classifier::{
    celsius_to_kelvin, classify, gauge_kelvin, AlarmLevel, DisplayColor, TemperatureSample, ThermalReading,
};
pub use monitor::ThermalMonitor;
