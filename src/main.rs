//! CLI entry point.
//!
//! Usage: `pipecheck <host> <port> <trials> <slots> <connections>`
//!
//! Exit status is the whole interface: 0 with `Success!` on stdout when
//! every trial validates, 1 with a diagnostic on stderr for usage errors,
//! constraint violations, transport errors, and response mismatches. Logs
//! go to stderr so stdout stays clean for the success indicator.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use pipecheck::{Overlay, Pool, RandomCorpus, Runner, Settings, TimeoutPolicy};

#[derive(Parser, Debug)]
#[command(name = "pipecheck")]
#[command(version, about = "Concurrency correctness checker for course HTTP servers")]
struct Cli {
    /// Server hostname or IP address
    host: String,

    /// Server TCP port
    port: u16,

    /// Number of trials to run
    trials: u32,

    /// Requests sent (and responses read) per trial
    slots: u32,

    /// Connections opened at startup; must be >= slots
    connections: u32,

    /// Per-read timeout in milliseconds (default 10)
    #[arg(long, value_name = "MS")]
    read_timeout_ms: Option<u64>,

    /// Cumulative per-response budget in milliseconds (default 100)
    #[arg(long, value_name = "MS")]
    total_timeout_ms: Option<u64>,

    /// Optional TOML settings file; flags take precedence over its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    // The checker's contract is exit status 1 for usage errors, not clap's
    // default 2. Help and version output still exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        },
    };

    init_logging();

    match run(cli) {
        Ok(()) => {
            println!("Success!");
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let overlay = match &cli.config {
        Some(path) => Overlay::load_from(path)?,
        None => Overlay::default(),
    };

    let settings = Settings {
        host: cli.host,
        port: cli.port,
        trials: cli.trials,
        slots: cli.slots,
        connections: cli.connections,
        timeout: TimeoutPolicy::resolve(&overlay.timeout, cli.read_timeout_ms, cli.total_timeout_ms),
    };
    settings.validate()?;

    let pool = Pool::open(&settings.host, settings.port, settings.connections)?;
    let mut runner = Runner::new(settings, pool, RandomCorpus::new());
    runner.run()?;

    Ok(())
}

/// Initialize stderr logging with env-filter support.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
