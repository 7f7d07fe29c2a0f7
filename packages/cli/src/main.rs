#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal client for the SuperCharger status service.
//!
//! Looks up stations, submits check-ins (from flags or through an
//! interactive prompt flow) and browses history, statistics and the
//! station overview. Running without a subcommand opens the interactive
//! menu.
//!
//! Uses `indicatif-log-bridge` (via [`suc_status_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and spinners never fight for the terminal.

mod browse;
mod checkin;
mod config;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use suc_status_checkin::toast::{ToastPositionResolver, Toaster};
use suc_status_cli_utils::{MultiProgress, TerminalToastSink};
use suc_status_client::ApiClient;

use crate::checkin::CheckinArgs;
use crate::config::AppConfig;

/// Report and browse SuperCharger occupancy.
#[derive(Parser)]
#[command(name = "suc_status")]
#[command(about = "Report and browse SuperCharger occupancy")]
struct Cli {
    /// Config file (default: `$SUC_STATUS_CONFIG` or `suc_status.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Status API base URL, overriding the config file.
    #[arg(long)]
    api_url: Option<String>,

    /// Subcommand to execute; interactive menu when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search the station directory by name or `lat,lng`.
    Lookup {
        /// Search text; words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Submit a check-in.
    Checkin(CheckinArgs),

    /// Guided check-in through prompts.
    Interactive,

    /// List recent check-ins.
    History {
        /// Only check-ins matching this text.
        #[arg(long, default_value = "")]
        filter: String,

        /// Maximum number of check-ins.
        #[arg(long, default_value_t = suc_status_stats::history::DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },

    /// Browse statistics by `/stats[/{country}[/{station}]]` path.
    Stats {
        /// Statistics path.
        #[arg(default_value = "/stats")]
        path: String,

        /// Print a station's chart table as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Latest state of every station.
    Overview {
        /// Only stations whose latest check-in reports a problem.
        #[arg(long)]
        problems: bool,
    },
}

/// Everything a command needs.
pub struct Context {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Status API.
    pub api: ApiClient,
    /// Progress/log multiplexer.
    pub multi: MultiProgress,
}

impl Context {
    /// Toaster rendering to the terminal with the configured anchors.
    #[must_use]
    pub fn toaster(&self) -> Toaster<TerminalToastSink> {
        let sink = TerminalToastSink::new(self.multi.clone())
            .clear_on_scroll(self.config.toast.clear_on_scroll);
        Toaster::new(ToastPositionResolver::new(self.config.toast.anchors), sink)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = suc_status_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.client.api_url = url;
    }
    log::debug!("Using status API at {}", config.client.api_url);
    let api = ApiClient::new(&config.client)?;
    let ctx = Context { config, api, multi };

    match cli.command {
        Some(Commands::Lookup { query }) => browse::lookup(&ctx, &query.join(" ")).await,
        Some(Commands::Checkin(args)) => checkin::run(&ctx, args).await?,
        Some(Commands::History { filter, limit }) => browse::history(&ctx, &filter, limit).await?,
        Some(Commands::Stats { path, json }) => browse::stats(&ctx, &path, json).await?,
        Some(Commands::Overview { problems }) => browse::overview(&ctx, problems).await?,
        Some(Commands::Interactive) | None => interactive::run(&ctx).await?,
    }

    Ok(())
}
