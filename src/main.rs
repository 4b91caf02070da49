//! dbtool - Idempotent database and table provisioning for RethinkDB
//!
//! This is the main entry point for the dbtool binary.
//! The actual logic is in the library modules for better testability.

use anyhow::{Context, Result};
use clap::Parser;
use dbtool::commands::{self, Report};
use dbtool::config;
use dbtool::db::RethinkConnector;
use dbtool::provision::Provisioner;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dbtool", version)]
#[command(about = "Ensure RethinkDB databases and tables exist")]
#[command(after_help = commands::HELP_TEXT)]
struct Args {
    /// Hostname of the RethinkDB node [default: localhost]
    #[arg(long)]
    host: Option<String>,

    /// Client driver port of the RethinkDB node [default: 28015]
    #[arg(long)]
    port: Option<u16>,

    /// Give up on the whole ensure call after this many seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Settings file [default: ~/.dbtool/config.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Command followed by its argument
    #[arg(value_name = "COMMAND")]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args).await {
        Ok(report) => {
            println!("{}", report.render());
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<Report> {
    let settings = match &args.config {
        Some(path) => config::settings::load_settings_from(path),
        None => config::load_settings(),
    }
    .context("Failed to load settings")?;
    let settings = settings.with_overrides(args.host, args.port);

    init_tracing(&settings.log_level);
    debug!(?settings, "loaded settings");

    let command = commands::parse_command(args.command.as_slice())?;
    if command != commands::Command::Help {
        println!("RethinkDB: {}", settings.endpoint);
    }

    let provisioner = Provisioner::new(RethinkConnector, settings.endpoint);
    let timeout = args.timeout.map(Duration::from_secs);
    let run = commands::execute_command(command, &provisioner, timeout);
    Ok(run.await?)
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dbtool={}", log_level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr),
        )
        .init();
}
