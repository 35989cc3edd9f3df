//! CLI command definitions and handlers.
//!
//! This module defines all available CLI commands using clap's derive macros.
//! Each subcommand has its own module with implementation details.

pub mod init;
pub mod simulate;

use crate::utils::{CliResult, OutputFormat};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use zenith_config::LoggingConfig;

/// Zenith - validator economics for a proof-of-stake chain
#[derive(Parser, Debug)]
#[command(name = "zenith")]
#[command(version)]
#[command(about = "Zenith node manager tools", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global output format for command results
    #[arg(global = true, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(global = true, short, long)]
    pub quiet: bool,

    /// Log line format (defaults to the configured format)
    #[arg(global = true, long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log line formats
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line human-readable output
    Compact,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    fn from_config(format: &str) -> Self {
        match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging flags shared by all commands.
#[derive(Debug, Clone, Copy)]
pub struct LogSettings {
    /// `--quiet`
    pub quiet: bool,
    /// Number of `-v` flags
    pub verbose: u8,
    /// `--log-format`
    pub format: Option<LogFormat>,
}

impl LogSettings {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the flags, and the flags over the
    /// `[logging]` section of `configured`.
    pub fn init(&self, configured: Option<&LoggingConfig>) {
        let level = match (self.quiet, self.verbose) {
            (true, _) => "error".to_string(),
            (_, 0) => configured
                .map(|c| c.level.to_lowercase())
                .unwrap_or_else(|| "warn".to_string()),
            (_, 1) => "info".to_string(),
            (_, 2) => "debug".to_string(),
            (_, _) => "trace".to_string(),
        };
        let format = self
            .format
            .or_else(|| configured.map(|c| LogFormat::from_config(&c.format)))
            .unwrap_or(LogFormat::Pretty);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.verbose >= 2)
            .with_writer(std::io::stderr);

        // A subscriber may already be installed when run from tests
        let _ = match format {
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration with a devnet genesis
    Init(init::InitArgs),

    /// Run genesis and blocks through the node manager
    Simulate(simulate::SimulateArgs),

    /// Show version information
    Version,
}

/// Execute the CLI with parsed arguments
pub fn run_cli(cli: Cli) -> CliResult<()> {
    let logging = LogSettings {
        quiet: cli.quiet,
        verbose: cli.verbose,
        format: cli.log_format,
    };

    match cli.command {
        Commands::Init(args) => {
            logging.init(None);
            init::execute(args, cli.output)
        }
        Commands::Simulate(args) => simulate::execute(args, cli.output, logging),
        Commands::Version => execute_version(cli.output),
    }
}

/// Execute the version command
fn execute_version(output_format: OutputFormat) -> CliResult<()> {
    let version_info = VersionInfo::new();

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&version_info)?);
        }
        OutputFormat::Text => {
            println!("Zenith CLI");
            println!("  Version:     {}", version_info.version);
            println!("  Git Commit:  {}", version_info.git_commit);
            println!("  Rust:        {}", version_info.rust_version);
            println!("  Target:      {}", version_info.target);
        }
    }

    Ok(())
}

/// Version information structure
#[derive(Debug, serde::Serialize)]
struct VersionInfo {
    version: String,
    git_commit: String,
    rust_version: String,
    target: String,
}

impl VersionInfo {
    fn new() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            git_commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
            rust_version: option_env!("RUSTC_VERSION")
                .unwrap_or(env!("CARGO_PKG_RUST_VERSION"))
                .to_string(),
            target: std::env::consts::ARCH.to_string() + "-" + std::env::consts::OS,
        }
    }
}
