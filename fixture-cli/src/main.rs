mod config;
mod logger;

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use fixture_core::{EntrantKind, LayoutEngine, Match, OptimizationRequest};
use fixture_optimizer::FixtureOptimizationService;
use serde::Serialize;
use thiserror::Error;

use config::Config;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Path to the config file. A missing file falls back to the defaults.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Arranges the participants of a json request into a seeding order.
    Optimize {
        /// Path to the json encoded `OptimizationRequest`.
        input: PathBuf,
    },
    /// Computes the positions and connectors of a single elimination bracket.
    Layout {
        /// Path to the json encoded list of matches.
        input: PathBuf,
        /// Overrides the entrant kind of the config.
        #[arg(short, long, value_enum)]
        kind: Option<Kind>,
    },
}

impl Command {
    async fn run(self, config: &Config) -> Result<(), Error> {
        match self {
            Self::Optimize { input } => {
                let request: OptimizationRequest = read_json(&input).await?;

                let service = FixtureOptimizationService::new(&config.optimizer);
                log::info!(
                    "Optimizing {} participants using {} mode",
                    request.participants.len(),
                    service.mode()
                );

                let result = service.optimize(&request).await;
                if result.fallback {
                    log::info!("Result was produced by the local fallback strategy");
                }

                write_json(&result)
            }
            Self::Layout { input, kind } => {
                let matches: Vec<Match> = read_json(&input).await?;

                let kind = kind.map(EntrantKind::from).unwrap_or(config.layout.entrant_kind);
                log::info!("Laying out {} matches for {} entrants", matches.len(), kind);

                let layout = LayoutEngine::new(kind).layout(&matches);

                write_json(&layout)
            }
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Kind {
    Player,
    Team,
}

impl From<Kind> for EntrantKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Player => Self::Player,
            Kind::Team => Self::Team,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load(&args.config).await {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config {}: {}", args.config.display(), err);
            process::exit(1);
        }
    };

    if let Err(err) = logger::init(config.loglevel) {
        eprintln!("Failed to initialize logger: {}", err);
        process::exit(1);
    }

    if let Err(err) = args.command.run(&config).await {
        eprintln!("{}", err);
        process::exit(1);
    }
}

async fn read_json<T>(path: &Path) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned,
{
    let buf = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&buf)?)
}

fn write_json<T>(value: &T) -> Result<(), Error>
where
    T: Serialize,
{
    let output = serde_json::to_string_pretty(value)?;
    println!("{}", output);
    Ok(())
}
