//! Monod replay binary.
//!
//! # Usage
//!
//! ```bash
//! # Replay a script, printing the final state as JSON
//! monod-replay crates/monod-replay/scripts/conflict.json
//!
//! # Open the session read-only, with verbose logs on stderr
//! monod-replay script.json --path '/r/A#s1' --log-level debug
//! ```

use std::{io, path::PathBuf, time::Duration};

use clap::Parser;
use monod_app::{DEFAULT_QUIESCENCE_WINDOW, SessionConfig};
use monod_replay::{ReplayConfig, load_script, replay};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Monod session replay
#[derive(Parser, Debug)]
#[command(name = "monod-replay")]
#[command(about = "Replay controller events and user input through a Monod session")]
#[command(version)]
struct Args {
    /// Path to the JSON script
    script: PathBuf,

    /// Location the session opens at (overrides the script)
    #[arg(short, long)]
    path: Option<String>,

    /// Debounce window for content updates, in milliseconds
    #[arg(long, default_value_t = DEFAULT_QUIESCENCE_WINDOW.as_millis() as u64)]
    quiescence_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    tracing::info!("Loading script {}", args.script.display());
    let script = load_script(&args.script).await?;

    let config = ReplayConfig {
        location: args.path,
        session: SessionConfig {
            quiescence_window: Duration::from_millis(args.quiescence_ms),
            ..SessionConfig::default()
        },
    };

    let report = replay(&script, config).await?;
    tracing::info!(
        dispatched = report.dispatched.len(),
        history = report.history.len(),
        "Replay finished"
    );

    report.write_json(io::stdout().lock())?;

    Ok(())
}
