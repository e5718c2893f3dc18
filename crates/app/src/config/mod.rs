//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod logging;

pub use logging::{LogFormat, LoggingConfig};

/// Wayfarer CLI configuration
#[derive(Debug, Parser)]
#[command(name = "wayfarer", about = "Wayfarer tour walking CLI", long_about = None)]
pub struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a walk fixture against an in-memory store and print every response.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Path to a YAML walk fixture
    #[arg(long, env = "WAYFARER_FIXTURE")]
    pub fixture: PathBuf,

    /// Pretty-print JSON responses
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl Cli {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
