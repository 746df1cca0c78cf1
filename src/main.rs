mod config;
mod db;
mod error;
mod models;
mod worker;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Args, PollConfig};
use crate::db::probe::{clear_libpq_env, PgProbe};
use crate::worker::poller::poll_until_ready;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    // before the runtime exists, so no other thread can be reading the environment
    clear_libpq_env();
    init_tracing();

    let config = match PollConfig::try_from(args) {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            error!("failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let probe = PgProbe::new(&config);
    let outcome = rt.block_on(poll_until_ready(&config, &probe));

    let attempts = outcome.attempts();
    let elapsed_secs = outcome.elapsed().as_secs_f64();
    if outcome.is_ready() {
        info!(attempts, elapsed_secs, "PostgreSQL connection successful!");
    } else {
        error!(attempts, elapsed_secs, "Failed to connect to PostgreSQL");
    }

    outcome.exit_code()
}
