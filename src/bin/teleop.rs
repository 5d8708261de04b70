// Keyboard joystick: W/S drive, A/D turn, Space brake, R/F stick throw, Q quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use tankdrive_runtime::config::{MAX_POWER, TICK_MS, TOPIC_CMD_OPERATOR};
use tankdrive_runtime::messages::OperatorCommand;

const THROWS: [f32; 3] = [0.3, 0.6, 1.0]; // fraction of full stick
const THROW_LABELS: [&str; 3] = ["LOW", "MED", "FULL"];
const INPUT_TIMEOUT_MS: u64 = 100; // Centre sticks after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_OPERATOR).await?;

    info!("Controls: W/S=drive, A/D=turn, Space=brake, R/F=throw, Q=quit");
    info!("Throw: {}", THROW_LABELS[0]);

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut throw_idx: usize = 0;

    let mut cmd = OperatorCommand {
        drive: 0.0,
        turn: 0.0,
        brake: false,
    };
    let mut last_input = Instant::now();

    loop {
        // Poll at the runtime's tick rate
        if event::poll(Duration::from_millis(TICK_MS))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                let stick = MAX_POWER * THROWS[throw_idx];

                match code {
                    KeyCode::Char('w') if pressed => cmd.drive = stick,
                    KeyCode::Char('s') if pressed => cmd.drive = -stick,
                    KeyCode::Char('a') if pressed => cmd.turn = -stick,
                    KeyCode::Char('d') if pressed => cmd.turn = stick,
                    KeyCode::Char(' ') if pressed => cmd.brake = true,

                    KeyCode::Char('r') if pressed => {
                        throw_idx = (throw_idx + 1).min(THROWS.len() - 1);
                        info!("Throw: {}", THROW_LABELS[throw_idx]);
                    }
                    KeyCode::Char('f') if pressed => {
                        throw_idx = throw_idx.saturating_sub(1);
                        info!("Throw: {}", THROW_LABELS[throw_idx]);
                    }

                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
                if pressed {
                    last_input = Instant::now();
                }
            }
        }

        if last_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            cmd = OperatorCommand {
                drive: 0.0,
                turn: 0.0,
                brake: false,
            };
        }

        publisher.put(serde_json::to_string(&cmd)?).await?;
    }

    Ok(())
}
