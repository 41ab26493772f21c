//! Command-line arguments

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use cta_tracker::TrackerConfig;

use crate::commands::{BusCommand, TrainCommand};

/// CTA tracker CLI
#[derive(Debug, Parser)]
#[command(name = "cta-tracker")]
#[command(author, version, about = "CTA Bus Tracker and Train Tracker client", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// CTA developer key (falls back to `cta-tracker.toml` and `CTA_API_KEY`)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Override the Bus Tracker base URL
    #[arg(long, global = true)]
    pub bus_url: Option<String>,

    /// Override the Train Tracker base URL
    #[arg(long, global = true)]
    pub train_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print validated records instead of the raw response
    #[arg(long, global = true)]
    pub typed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Query the Bus Tracker API
    #[command(subcommand)]
    Bus(BusCommand),

    /// Query the Train Tracker API
    #[command(subcommand)]
    Train(TrainCommand),

    /// Record the vehicles on a route together with their predictions
    Snapshot {
        /// Route to follow
        #[arg(long, default_value = "20")]
        rt: String,

        /// Repeat every N seconds until interrupted
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl Cli {
    /// Build the tracker configuration from flags, falling back to file and environment
    pub fn tracker_config(&self) -> anyhow::Result<TrackerConfig> {
        let mut config = match &self.api_key {
            Some(key) => TrackerConfig::new(key.as_str()),
            None => TrackerConfig::load()
                .context("no --api-key given and no usable cta-tracker configuration found")?,
        };

        if let Some(url) = &self.bus_url {
            config = config.with_bus_base_url(url.as_str());
        }
        if let Some(url) = &self.train_url {
            config = config.with_train_base_url(url.as_str());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout_secs(timeout);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Map the `-v` count to a tracing filter
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use std::ffi::OsString;

    use cta_tracker::TimeResolution;

    use super::*;

    fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        Cli::try_parse_from(os_args)
    }

    #[test]
    fn parses_bus_predictions() {
        let cli = parse_args(&[
            "cta-tracker",
            "bus",
            "predictions",
            "--stpid",
            "1001,1002",
            "--top",
            "3",
            "--tmres",
            "m",
        ])
        .unwrap();

        match cli.command {
            Commands::Bus(BusCommand::Predictions {
                stpid,
                rt,
                vid,
                top,
                tmres,
            }) => {
                assert_eq!(stpid.as_deref(), Some("1001,1002"));
                assert!(rt.is_none());
                assert!(vid.is_none());
                assert_eq!(top, Some(3));
                assert_eq!(tmres, TimeResolution::Minutes);
            },
            other => panic!("Expected bus predictions, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_time_resolution() {
        assert!(parse_args(&["cta-tracker", "bus", "vehicles", "--rt", "20", "--tmres", "h"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse_args(&[
            "cta-tracker",
            "train",
            "arrivals",
            "--mapid",
            "40380",
            "--typed",
            "-vv",
            "--api-key",
            "k",
        ])
        .unwrap();

        assert!(cli.typed);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(matches!(
            cli.command,
            Commands::Train(TrainCommand::Arrivals { ref mapid, .. }) if mapid.as_deref() == Some("40380")
        ));
    }

    #[test]
    fn follow_requires_run_number() {
        assert!(parse_args(&["cta-tracker", "train", "follow"]).is_err());

        let cli = parse_args(&["cta-tracker", "train", "follow", "831"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Train(TrainCommand::Follow { ref runnumber }) if runnumber == "831"
        ));
    }

    #[test]
    fn snapshot_defaults_to_route_20() {
        let cli = parse_args(&["cta-tracker", "snapshot"]).unwrap();
        match cli.command {
            Commands::Snapshot { rt, interval } => {
                assert_eq!(rt, "20");
                assert!(interval.is_none());
            },
            other => panic!("Expected snapshot, got {other:?}"),
        }
    }

    #[test]
    fn tracker_config_applies_overrides() {
        let cli = parse_args(&[
            "cta-tracker",
            "--api-key",
            "secret",
            "--bus-url",
            "http://localhost:8080/bustime/api/v3",
            "--timeout",
            "3",
            "bus",
            "routes",
        ])
        .unwrap();

        let config = cli.tracker_config().unwrap();
        assert_eq!(config.bus_base_url, "http://localhost:8080/bustime/api/v3");
        assert_eq!(config.train_base_url, cta_tracker::DEFAULT_TRAIN_BASE_URL);
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn tracker_config_rejects_bad_url() {
        let cli = parse_args(&[
            "cta-tracker",
            "--api-key",
            "secret",
            "--train-url",
            "not a url",
            "train",
            "positions",
            "--rt",
            "Red",
        ])
        .unwrap();

        assert!(cli.tracker_config().is_err());
    }

    #[test]
    fn verbosity_filters() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(7), "trace");
    }
}
