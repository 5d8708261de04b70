use clap::Parser;
use tracing_subscriber::EnvFilter;

use tankdrive_runtime::config::{Args, RuntimeConfig};

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=debug to see every tick)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match RuntimeConfig::try_from(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = tankdrive_runtime::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
