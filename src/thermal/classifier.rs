// Temperature classification into alarm levels

use crate::config::ThermalConfig;

/// Offset between Celsius and Kelvin
pub const KELVIN_OFFSET: f64 = 273.15;

/// One temperature reading, or the lack of one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureSample {
    Celsius(f64),
    Unavailable,
}

impl TemperatureSample {
    /// Any non-finite raw value means the sensor gave no data
    pub fn from_raw(celsius: f64) -> Self {
        if celsius.is_finite() {
            Self::Celsius(celsius)
        } else {
            Self::Unavailable
        }
    }
}

/// Ordered severity bands. `Unknown` sorts lowest.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlarmLevel {
    Unknown = 0,
    Normal = 1,
    Warm = 2,
    Hot = 3,
    Critical = 4,
}

impl AlarmLevel {
    /// Level number as shown on the display, `None` for Unknown
    pub fn number(self) -> Option<u8> {
        match self {
            Self::Unknown => None,
            other => Some(other as u8),
        }
    }

    /// Colour used to draw this level. Unknown is drawn as Critical.
    pub fn color(self) -> DisplayColor {
        match self {
            Self::Normal => DisplayColor::GREEN,
            Self::Warm => DisplayColor::YELLOW,
            Self::Hot => DisplayColor::ORANGE,
            Self::Critical | Self::Unknown => DisplayColor::RED,
        }
    }
}

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayColor(pub u32);

impl DisplayColor {
    pub const GREEN: Self = Self(0x2ecc71);
    pub const YELLOW: Self = Self(0xf1c40f);
    pub const ORANGE: Self = Self(0xe67e22);
    pub const RED: Self = Self(0xe74c3c);
}

impl std::fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Result of classifying one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalReading {
    pub level: AlarmLevel,
    /// Unclamped Kelvin value, `None` when the sensor gave no data
    pub kelvin: Option<f64>,
    /// Kelvin clamped to the display range, for the gauge needle only
    pub gauge_kelvin: f64,
    pub color: DisplayColor,
}

impl ThermalReading {
    pub fn is_unavailable(&self) -> bool {
        self.kelvin.is_none()
    }
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Map a Celsius value onto the alarm bands `[lo, mid)`, `[mid, hi)`, `[hi, inf)`
fn level_for(celsius: f64, thresholds: &[f64; 3]) -> AlarmLevel {
    let [warm, hot, critical] = *thresholds;
    if celsius < warm {
        AlarmLevel::Normal
    } else if celsius < hot {
        AlarmLevel::Warm
    } else if celsius < critical {
        AlarmLevel::Hot
    } else {
        AlarmLevel::Critical
    }
}

/// Gauge needle position: Kelvin clamped into `[min, max]`, resting at `min`
/// when there is no data. Never panics on a malformed range.
pub fn gauge_kelvin(kelvin: Option<f64>, display_range: &[f64; 2]) -> f64 {
    match kelvin {
        Some(k) => k.max(display_range[0]).min(display_range[1]),
        None => display_range[0],
    }
}

/// Classify one sample.
///
/// Bands are decided on the Celsius value. Kelvin is only for display, and the
/// gauge value is clamped to `display_range`. A missing sample is Unknown but
/// is coloured like Critical so a dead sensor gets noticed.
pub fn classify(sample: TemperatureSample, config: &ThermalConfig) -> ThermalReading {
    match sample {
        TemperatureSample::Unavailable => ThermalReading {
            level: AlarmLevel::Unknown,
            kelvin: None,
            gauge_kelvin: gauge_kelvin(None, &config.display_range),
            color: AlarmLevel::Unknown.color(),
        },
        TemperatureSample::Celsius(c) => {
            let level = level_for(c, &config.thresholds);
            let kelvin = celsius_to_kelvin(c);
            ThermalReading {
                level,
                kelvin: Some(kelvin),
                gauge_kelvin: gauge_kelvin(Some(kelvin), &config.display_range),
                color: level.color(),
            }
        }
    }
}
