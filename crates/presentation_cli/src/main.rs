//! CTA tracker CLI
//!
//! Query the Bus Tracker and Train Tracker APIs from the command line and
//! record route snapshots.

#![allow(clippy::print_stdout)]

mod cli;
mod commands;
mod snapshot;

use std::time::Duration;

use clap::Parser;
use cta_tracker::BusTracker;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_filter_from_verbosity(cli.verbose)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.tracker_config()?;

    match cli.command {
        Commands::Bus(command) => {
            let document = commands::run_bus(command, &config, cli.typed).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        },
        Commands::Train(command) => {
            let document = commands::run_train(command, &config, cli.typed).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        },
        Commands::Snapshot { rt, interval } => {
            let tracker = BusTracker::new(&config)?;
            loop {
                match snapshot::capture(&tracker, &rt).await {
                    Ok(snapshot) => {
                        info!(
                            route = %rt,
                            batches = snapshot.predictions.len(),
                            "Snapshot captured"
                        );
                        println!("{}", serde_json::to_string(&snapshot)?);
                    },
                    // Retryable failures are only logged when repeating
                    Err(e) if interval.is_some() && e.is_retryable() => {
                        warn!(error = %e, "Snapshot failed");
                    },
                    Err(e) => return Err(e.into()),
                }

                let Some(secs) = interval else { break };
                tokio::time::sleep(Duration::from_secs(secs)).await;
            }
        },
    }

    Ok(())
}
