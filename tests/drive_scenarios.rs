// End-to-end drive and thermal scenarios against simulated hardware

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tankdrive_runtime::config::{DriveConfig, ThermalConfig, THERMAL_MOTORS};
use tankdrive_runtime::display::DisplayBoard;
use tankdrive_runtime::drive::control::run_loop;
use tankdrive_runtime::drive::{ControlLoop, MotorPowers};
use tankdrive_runtime::ports::DisplaySink;
use tankdrive_runtime::sim::{SimMotor, SimThermal, StickInput};
use tankdrive_runtime::thermal::{AlarmLevel, DisplayColor, ThermalMonitor};

#[test]
fn ramp_then_brake_then_resume() {
    let left = SimMotor::new();
    let right = SimMotor::new();
    let mut control = ControlLoop::new(DriveConfig::default(), left.clone(), right.clone());

    let forward = StickInput::new(100.0, 0.0, false);
    let mut previous = 0.0;
    for _ in 0..13 {
        let out = control.tick(&forward);
        assert!(out.powers.left <= 100.0);
        assert!(out.powers.left - previous <= 8.0);
        previous = out.powers.left;
    }
    assert_eq!(left.last_power(), Some(100.0));
    assert_eq!(right.last_power(), Some(100.0));

    let out = control.tick(&StickInput::new(100.0, 40.0, true));
    assert!(out.braked);
    assert!(left.is_braked() && right.is_braked());
    assert_eq!(control.axes(), (0.0, 0.0));

    let out = control.tick(&StickInput::new(100.0, 40.0, false));
    assert_eq!(out.powers, MotorPowers::new(24.0, -8.0));
}

#[test]
fn tuned_variant_is_just_config() {
    let config = DriveConfig {
        drive_max_delta: 6.0,
        turn_max_delta: 12.0,
        turn_sensitivity: 0.6,
        ..DriveConfig::default()
    };
    let mut control = ControlLoop::new(config, SimMotor::new(), SimMotor::new());
    let out = control.tick(&StickInput::new(127.0, 127.0, false));
    assert_eq!(out.powers, MotorPowers::new(18.0, -6.0));
}

#[test]
fn monitor_fills_board() {
    let sensors = vec![
        SimThermal::constant(40.0),
        SimThermal::constant(56.0),
        SimThermal::unplugged(),
        SimThermal::constant(10.0),
    ];
    let board = DisplayBoard::new(&THERMAL_MOTORS, &ThermalConfig::default());
    let mut monitor = ThermalMonitor::new(ThermalConfig::default(), sensors, board);
    monitor.poll_once();

    let slots = monitor.sink().slots();
    assert_eq!(slots[0].level, AlarmLevel::Normal);
    assert_eq!(slots[1].level, AlarmLevel::Hot);
    assert_eq!(slots[2].level, AlarmLevel::Unknown);
    assert_eq!(slots[2].temp_label, "No data");
    assert_eq!(slots[2].color, DisplayColor::RED);
    assert_eq!(slots[3].gauge, 293);
    assert_eq!(slots[3].temp_label, "283.1 K");
}

/// Counts updates and which levels were seen
#[derive(Clone, Default)]
struct CountingSink(Arc<Mutex<Vec<AlarmLevel>>>);

impl DisplaySink for CountingSink {
    fn update_slot(&mut self, _id: usize, level: AlarmLevel, _kelvin: Option<f64>) {
        self.0.lock().unwrap().push(level);
    }
}

#[tokio::test(start_paused = true)]
async fn loops_run_independently() {
    let left = SimMotor::new();
    let left_view = left.clone();
    let control = ControlLoop::new(DriveConfig::default(), left, SimMotor::new());

    // Every thermal channel is dead; drive must not care
    let sink = CountingSink::default();
    let monitor = ThermalMonitor::new(
        ThermalConfig::default(),
        vec![SimThermal::unplugged(), SimThermal::unplugged()],
        sink.clone(),
    );

    let thermal = tokio::spawn(monitor.run());
    let drive = tokio::spawn(run_loop(control, || StickInput::new(100.0, 0.0, false)));

    // Drive ticks at 0..=280ms (15 ticks), thermal polls at 0 and 250ms
    tokio::time::sleep(Duration::from_millis(290)).await;
    drive.abort();
    thermal.abort();

    assert_eq!(left_view.last_power(), Some(100.0));
    let levels = sink.0.lock().unwrap().clone();
    assert_eq!(levels.len(), 4);
    assert!(levels.iter().all(|l| *l == AlarmLevel::Unknown));
}
