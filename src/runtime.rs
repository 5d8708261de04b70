// Runtime wiring: drive loop and thermal monitor as two independent tasks
//
// Operator commands arrive over zenoh and pass through a watchdog: if the
// teleop stops sending, the sticks read as centred and the base slews to rest.

use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::{
    RuntimeConfig, CMD_TIMEOUT, LEFT_MOTORS, RIGHT_MOTORS, THERMAL_MOTORS, TOPIC_CMD_OPERATOR,
};
use crate::display::DisplayBoard;
use crate::drive::control::{run_loop, ControlLoop};
use crate::error::RuntimeError;
use crate::messages::{OperatorCommand, RuntimeHealth};
use crate::motor::{shared, FeetechBus, MotorGroup, MotorProbe};
use crate::ports::{MotorOutput, TemperatureSensor};
use crate::sim::{SimMotor, SimThermal, StickInput};
use crate::thermal::ThermalMonitor;

type BoxedMotor = Box<dyn MotorOutput + Send>;
type BoxedSensor = Box<dyn TemperatureSensor + Send>;

/// Latest operator command plus the staleness watchdog
pub struct CommandInput {
    latest_cmd: Option<OperatorCommand>,
    cmd_received_at: Instant,
    health: RuntimeHealth,
}

impl Default for CommandInput {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandInput {
    pub fn new() -> Self {
        Self {
            latest_cmd: None,
            cmd_received_at: Instant::now(),
            health: RuntimeHealth::CmdStale, // Start stale until first cmd
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn on_command(&mut self, cmd: OperatorCommand) {
        self.on_command_at(cmd, Instant::now());
    }

    fn on_command_at(&mut self, cmd: OperatorCommand, at: Instant) {
        self.latest_cmd = Some(cmd);
        self.cmd_received_at = at;
    }

    /// Parse a raw JSON payload; bad payloads are logged and dropped
    pub fn on_payload(&mut self, payload: &[u8]) {
        match serde_json::from_slice::<OperatorCommand>(payload) {
            Ok(cmd) => self.on_command(cmd),
            Err(e) => warn!("Failed to parse operator command: {}", e),
        }
    }

    /// Stick state for this tick, centred when the command is stale
    pub fn poll(&mut self) -> StickInput {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> StickInput {
        let cmd_age = now.saturating_duration_since(self.cmd_received_at);

        match self.latest_cmd {
            Some(cmd) if cmd_age <= CMD_TIMEOUT => {
                if self.health != RuntimeHealth::Ok {
                    info!("Operator commands flowing");
                }
                self.health = RuntimeHealth::Ok;
                StickInput::new(cmd.drive, cmd.turn, cmd.brake)
            }
            _ => {
                // Watchdog triggered - centre the sticks
                if self.health != RuntimeHealth::CmdStale {
                    warn!("Operator command stale ({:?} old), slewing to rest", cmd_age);
                }
                self.health = RuntimeHealth::CmdStale;
                StickInput::default()
            }
        }
    }
}

/// Drive sides and thermal sensors, from hardware or simulation
fn build_ports(config: &RuntimeConfig) -> Result<(BoxedMotor, BoxedMotor, Vec<BoxedSensor>), RuntimeError> {
    if config.simulate {
        info!("Simulation mode: no motor hardware");
        let sensors = THERMAL_MOTORS
            .iter()
            .map(|_| Box::new(SimThermal::constant(35.0)) as BoxedSensor)
            .collect();
        return Ok((Box::new(SimMotor::new()), Box::new(SimMotor::new()), sensors));
    }

    info!("Opening motor bus on {}", config.port);
    let bus = shared(FeetechBus::open(&config.port)?);

    let mut left = MotorGroup::new(bus.clone(), &LEFT_MOTORS);
    let mut right = MotorGroup::new(bus.clone(), &RIGHT_MOTORS);
    left.initialize()?;
    right.initialize()?;
    info!("Motors initialized successfully");

    let sensors = THERMAL_MOTORS
        .iter()
        .map(|&id| Box::new(MotorProbe::connect(bus.clone(), id)) as BoxedSensor)
        .collect();
    Ok((Box::new(left), Box::new(right), sensors))
}

pub async fn run(config: RuntimeConfig) -> Result<(), RuntimeError> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default())
        .await
        .map_err(|e| RuntimeError::Zenoh(e.to_string()))?;
    let subscriber = session
        .declare_subscriber(TOPIC_CMD_OPERATOR)
        .await
        .map_err(|e| RuntimeError::Zenoh(e.to_string()))?;
    info!("Subscribed to: {}", TOPIC_CMD_OPERATOR);

    let (left, right, sensors) = build_ports(&config)?;

    let board = DisplayBoard::new(&THERMAL_MOTORS, &config.thermal);
    let monitor = ThermalMonitor::new(config.thermal, sensors, board);
    let control = ControlLoop::new(config.drive, left, right);

    let mut commands = CommandInput::new();
    let next_input = move || {
        // Drain all pending commands (non-blocking), keep latest
        while let Ok(Some(sample)) = subscriber.try_recv() {
            commands.on_payload(&sample.payload().to_bytes());
        }
        commands.poll()
    };

    let thermal_task = tokio::spawn(monitor.run());
    let drive_task = tokio::spawn(run_loop(control, next_input));

    info!(
        "Runtime started: {}ms drive tick, {}ms thermal poll, {}ms watchdog timeout",
        config.drive.tick_period.as_millis(),
        config.thermal.poll_period.as_millis(),
        CMD_TIMEOUT.as_millis()
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    // Dropping the drive loop drops the motor groups, which brake on drop
    drive_task.abort();
    thermal_task.abort();
    for (name, task) in [("drive", drive_task), ("thermal", thermal_task)] {
        if let Err(e) = task.await {
            if !e.is_cancelled() {
                error!("{} task failed: {}", name, e);
            }
        }
    }
    Ok(())
}
