mod config;
mod repl;
mod snapshot;
mod store;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use config::Config;
use repl::Session;
use store::Store;

#[derive(Debug, Parser)]
#[command(name = "corekv", about = "In-memory key-value store with an interactive shell")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    init_logging(&config.log)?;

    info!("Starting corekv - in-memory KV store");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Type 'exit' to quit");

    let store = Arc::new(Store::new());
    let session = Session::new(store, config.prompt, config.snapshot.format);

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), stdout.lock())?;

    Ok(())
}

/// Initialize logging, `RUST_LOG` overrides the configured level
fn init_logging(log: &config::LogConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to open log file '{}'", path))?;
            builder.with_writer(std::sync::Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}
