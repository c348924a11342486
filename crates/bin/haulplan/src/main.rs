//! # haulplan — driving-time compliance and rest-stop planning CLI
//!
//! Composition root that wires the driver store and services together.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize logging on stderr so stdout stays machine-readable
//! - Construct the in-memory driver store and the application services
//! - Read a planning request, run it, and print the result
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod request;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use config::Config;
use request::{PlanRequest, Planner};

#[derive(Debug, Parser)]
#[command(name = "haulplan", version)]
#[command(about = "Check driving-time compliance and plan rest stops for a trip")]
struct Args {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, global = true, default_value = "haulplan.toml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Gate the trip and plan the rest stops it needs
    Plan {
        /// JSON planning request
        request: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Only check whether the trip can be driven without stopping
    Check {
        /// JSON planning request
        request: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Pretty-printed JSON
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let planner = Planner::new(config.limits);

    match args.cmd {
        Cmd::Plan { request, format } => {
            let request = read_request(&request)?;
            let analysis = planner.plan(&request).await.context("planning trip")?;
            match format {
                OutputFormat::Text => print!("{analysis}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
            }
            Ok(exit_code(analysis.feasible()))
        }
        Cmd::Check { request, format } => {
            let request = read_request(&request)?;
            let result = planner.check(&request).await.context("checking trip")?;
            match format {
                OutputFormat::Text if result.compliant => {
                    println!("compliant: trip can be driven without a rest stop");
                }
                OutputFormat::Text => {
                    println!("not compliant:");
                    for warning in &result.warnings {
                        println!("  ! {warning}");
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            }
            Ok(exit_code(result.compliant))
        }
    }
}

fn read_request(path: &Path) -> Result<PlanRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading request {}", path.display()))?;
    PlanRequest::from_json(&content).with_context(|| format!("parsing request {}", path.display()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::from(2) }
}
