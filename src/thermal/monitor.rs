// Periodic thermal poller: read every tracked motor, classify, push to the display

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::classifier::{classify, TemperatureSample, ThermalReading};
use crate::config::ThermalConfig;
use crate::ports::{DisplaySink, TemperatureSensor};

/// Polls one sensor per tracked motor and feeds a display sink.
///
/// Sensor `i` always reports into display slot `i`. A sensor without data
/// reports Unknown every cycle; it is never retried or treated as fatal.
pub struct ThermalMonitor<S, D> {
    config: ThermalConfig,
    sensors: Vec<S>,
    sink: D,
}

impl<S: TemperatureSensor, D: DisplaySink> ThermalMonitor<S, D> {
    pub fn new(config: ThermalConfig, sensors: Vec<S>, sink: D) -> Self {
        Self {
            config,
            sensors,
            sink,
        }
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn tracked(&self) -> usize {
        self.sensors.len()
    }

    /// Read, classify and publish every tracked motor once
    pub fn poll_once(&mut self) -> Vec<ThermalReading> {
        let mut readings = Vec::with_capacity(self.sensors.len());
        for (id, sensor) in self.sensors.iter_mut().enumerate() {
            let sample = TemperatureSample::from_raw(sensor.read_temperature_celsius());
            let reading = classify(sample, &self.config);
            debug!(
                "Thermal slot {}: {:?} -> {:?} ({:?} K)",
                id, sample, reading.level, reading.kelvin
            );
            self.sink.update_slot(id, reading.level, reading.kelvin);
            readings.push(reading);
        }
        readings
    }

    /// Poll at the configured period, forever. Overrun polls skip missed ticks.
    pub async fn run(mut self) {
        let period = self.config.poll_period;
        let mut tick = interval(period.max(Duration::from_millis(1)));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Thermal monitor started: {} motors every {}ms, thresholds {:?} C",
            self.sensors.len(),
            period.as_millis(),
            self.config.thresholds
        );

        loop {
            tick.tick().await;
            self.poll_once();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimThermal;
    use crate::thermal::AlarmLevel;

    /// Sink that records every update
    #[derive(Default)]
    struct RecordingSink {
        updates: Vec<(usize, AlarmLevel, Option<f64>)>,
    }

    impl DisplaySink for RecordingSink {
        fn update_slot(&mut self, id: usize, level: AlarmLevel, kelvin: Option<f64>) {
            self.updates.push((id, level, kelvin));
        }
    }

    fn four_motors() -> Vec<SimThermal> {
        vec![
            SimThermal::constant(30.0),
            SimThermal::constant(50.0),
            SimThermal::unplugged(),
            SimThermal::constant(70.0),
        ]
    }

    #[test]
    fn test_poll_updates_each_slot_in_order() {
        let mut monitor =
            ThermalMonitor::new(ThermalConfig::default(), four_motors(), RecordingSink::default());
        monitor.poll_once();

        let updates = &monitor.sink().updates;
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[0], (0, AlarmLevel::Normal, Some(30.0 + 273.15)));
        assert_eq!(updates[1], (1, AlarmLevel::Warm, Some(50.0 + 273.15)));
        assert_eq!(updates[2], (2, AlarmLevel::Unknown, None));
        assert_eq!(updates[3], (3, AlarmLevel::Critical, Some(70.0 + 273.15)));
    }

    #[test]
    fn test_no_hysteresis_between_polls() {
        let sensors = vec![SimThermal::scripted([66.0, 44.0, f64::NAN, 56.0])];
        let mut monitor =
            ThermalMonitor::new(ThermalConfig::default(), sensors, RecordingSink::default());

        let levels: Vec<AlarmLevel> = (0..4).map(|_| monitor.poll_once()[0].level).collect();
        assert_eq!(
            levels,
            vec![
                AlarmLevel::Critical,
                AlarmLevel::Normal,
                AlarmLevel::Unknown,
                AlarmLevel::Hot
            ]
        );
    }

    #[test]
    fn test_unplugged_sensor_keeps_reporting() {
        let mut monitor = ThermalMonitor::new(
            ThermalConfig::default(),
            vec![SimThermal::unplugged()],
            RecordingSink::default(),
        );
        for _ in 0..3 {
            monitor.poll_once();
        }
        assert_eq!(monitor.sink().updates.len(), 3);
        assert!(monitor
            .sink()
            .updates
            .iter()
            .all(|u| *u == (0, AlarmLevel::Unknown, None)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_at_period() {
        use std::sync::{Arc, Mutex};

        struct SharedSink(Arc<Mutex<usize>>);
        impl DisplaySink for SharedSink {
            fn update_slot(&mut self, _id: usize, _level: AlarmLevel, _kelvin: Option<f64>) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let count = Arc::new(Mutex::new(0));
        let monitor = ThermalMonitor::new(
            ThermalConfig::default(),
            four_motors(),
            SharedSink(count.clone()),
        );
        let task = tokio::spawn(monitor.run());

        // Polls at 0, 250 and 500ms
        tokio::time::sleep(Duration::from_millis(600)).await;
        task.abort();

        assert_eq!(*count.lock().unwrap(), 12);
    }
}
