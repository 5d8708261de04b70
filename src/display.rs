// Thermal display board: one gauge slot per tracked motor
//
// Each slot shows a half-arc gauge (Kelvin, clamped to the display range),
// a numeric label and a colour-coded level label. Slots are created with the
// board and only change through `DisplaySink::update_slot`.

use tracing::{debug, error, info, warn};

use crate::config::ThermalConfig;
use crate::ports::DisplaySink;
use crate::thermal::{gauge_kelvin, AlarmLevel, DisplayColor};

/// Display state of one motor
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySlot {
    pub title: String,
    /// Needle position in whole Kelvin, within the display range
    pub gauge: i32,
    pub temp_label: String,
    pub level_label: String,
    pub color: DisplayColor,
    pub level: AlarmLevel,
}

impl DisplaySlot {
    fn new(title: String, display_range: [f64; 2]) -> Self {
        Self {
            title,
            gauge: gauge_kelvin(None, &display_range).round() as i32,
            temp_label: "--.- K".to_string(),
            level_label: "Level: -/4".to_string(),
            color: AlarmLevel::Unknown.color(),
            level: AlarmLevel::Unknown,
        }
    }

    /// Redraw from a classified reading
    pub fn update(&mut self, level: AlarmLevel, kelvin: Option<f64>, display_range: [f64; 2]) {
        self.level = level;
        self.color = level.color();
        match (kelvin, level.number()) {
            (Some(k), Some(n)) => {
                self.gauge = gauge_kelvin(Some(k), &display_range).round() as i32;
                self.temp_label = format!("{:.1} K", k);
                self.level_label = format!("Level: {}/4", n);
            }
            _ => {
                self.gauge = gauge_kelvin(None, &display_range).round() as i32;
                self.temp_label = "No data".to_string();
                self.level_label = "Level: -/4".to_string();
            }
        }
    }

    /// One-line text rendering
    pub fn render(&self) -> String {
        format!(
            "{} [{}] {} {} {}",
            self.title, self.gauge, self.temp_label, self.level_label, self.color
        )
    }
}

/// Owns every slot; written only by the thermal monitor through `DisplaySink`
#[derive(Debug, Clone)]
pub struct DisplayBoard {
    slots: Vec<DisplaySlot>,
    display_range: [f64; 2],
}

impl DisplayBoard {
    /// Build one slot per motor id, titled "Mx (Port N)"
    pub fn new(motor_ids: &[u8], config: &ThermalConfig) -> Self {
        let slots = motor_ids
            .iter()
            .enumerate()
            .map(|(i, id)| DisplaySlot::new(slot_title(i, *id), config.display_range))
            .collect();
        Self {
            slots,
            display_range: config.display_range,
        }
    }

    pub fn slots(&self) -> &[DisplaySlot] {
        &self.slots
    }

    pub fn slot(&self, id: usize) -> Option<&DisplaySlot> {
        self.slots.get(id)
    }

    /// Text rendering of the whole board, one line per slot
    pub fn render(&self) -> Vec<String> {
        self.slots.iter().map(DisplaySlot::render).collect()
    }
}

fn slot_title(index: usize, motor_id: u8) -> String {
    format!("M{} (Port {})", index + 1, motor_id)
}

impl DisplaySink for DisplayBoard {
    fn update_slot(&mut self, id: usize, level: AlarmLevel, kelvin: Option<f64>) {
        let range = self.display_range;
        let Some(slot) = self.slots.get_mut(id) else {
            warn!("Display update for unknown slot {}", id);
            return;
        };

        let previous = slot.level;
        slot.update(level, kelvin, range);

        if previous != level {
            match level {
                AlarmLevel::Normal | AlarmLevel::Warm => {
                    info!("{}: {:?} -> {:?} ({})", slot.title, previous, level, slot.temp_label)
                }
                AlarmLevel::Hot => {
                    warn!("{}: {:?} -> {:?} ({})", slot.title, previous, level, slot.temp_label)
                }
                AlarmLevel::Critical | AlarmLevel::Unknown => {
                    error!("{}: {:?} -> {:?} ({})", slot.title, previous, level, slot.temp_label)
                }
            }
        }
        debug!("{}", slot.render());
    }
}
