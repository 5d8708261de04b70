// Operator drive loop: slew both axes, mix, write both sides, brake on demand

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::mixer::{mix, MotorPowers};
use super::slew;
use crate::config::DriveConfig;
use crate::ports::{Axis, Button, MotorOutput, OperatorInput};

/// What one tick commanded
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveOutput {
    /// Mix written to the motors this tick (before any brake override)
    pub powers: MotorPowers,
    /// True when the brake overrode the mix
    pub braked: bool,
}

/// Drive control loop for a two-sided base
///
/// Owns the slewed drive and turn axis values. Nothing else writes them.
pub struct ControlLoop<L, R> {
    config: DriveConfig,
    drive: f32,
    turn: f32,
    left: L,
    right: R,
}

impl<L: MotorOutput, R: MotorOutput> ControlLoop<L, R> {
    pub fn new(config: DriveConfig, left: L, right: R) -> Self {
        Self {
            config,
            drive: 0.0,
            turn: 0.0,
            left,
            right,
        }
    }

    /// Current (drive, turn) axis values
    pub fn axes(&self) -> (f32, f32) {
        (self.drive, self.turn)
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn left(&self) -> &L {
        &self.left
    }

    pub fn right(&self) -> &R {
        &self.right
    }

    /// Run one control tick against the given operator input
    pub fn tick(&mut self, input: &impl OperatorInput) -> DriveOutput {
        let raw_drive = input.analog(Axis::Drive);
        let raw_turn = input.analog(Axis::Turn) * self.config.turn_sensitivity;

        self.drive = slew::apply(self.drive, raw_drive, self.config.drive_max_delta);
        self.turn = slew::apply(self.turn, raw_turn, self.config.turn_max_delta);

        let powers = mix(self.drive, self.turn);
        if let Err(e) = self.left.move_power(powers.left) {
            warn!("Left drive write failed: {}", e);
        }
        if let Err(e) = self.right.move_power(powers.right) {
            warn!("Right drive write failed: {}", e);
        }

        // Brake overrides the mix just written
        let braked = input.digital(Button::Brake);
        if braked {
            self.brake();
        }

        DriveOutput { powers, braked }
    }

    /// Brake both sides and restart both axes from rest
    pub fn brake(&mut self) {
        if let Err(e) = self.left.brake() {
            warn!("Left brake failed: {}", e);
        }
        if let Err(e) = self.right.brake() {
            warn!("Right brake failed: {}", e);
        }
        self.drive = 0.0;
        self.turn = 0.0;
    }
}

/// Drive the loop at the configured period, forever.
///
/// `next_input` is called once per tick to fetch the operator state.
/// Ticks that overrun are skipped, not queued.
pub async fn run_loop<L, R, I, F>(mut control: ControlLoop<L, R>, mut next_input: F)
where
    L: MotorOutput,
    R: MotorOutput,
    I: OperatorInput,
    F: FnMut() -> I,
{
    let period = control.config().tick_period;
    let mut tick = interval(period.max(Duration::from_millis(1)));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Drive loop started: {}ms tick, slew drive={} turn={}, turn sensitivity={}",
        period.as_millis(),
        control.config().drive_max_delta,
        control.config().turn_max_delta,
        control.config().turn_sensitivity
    );

    let mut was_braked = false;
    loop {
        tick.tick().await;

        let input = next_input();
        let out = control.tick(&input);

        if out.braked && !was_braked {
            info!("Brake engaged");
        }
        was_braked = out.braked;

        debug!(
            "Drive tick: left={:.1}, right={:.1}, braked={}",
            out.powers.left, out.powers.right, out.braked
        );
    }
}
