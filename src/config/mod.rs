pub mod toml_config;

use crate::domain::model::BranchMap;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_INBOX: &str = "Entrada";
pub const DEFAULT_OUTPUT: &str = "Saida";
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Parser)]
#[command(name = "biblio-etl")]
#[command(about = "Processes library loan and pending-return reports into per-branch workbooks")]
pub struct CliConfig {
    /// Inbox directory watched for incoming reports
    #[arg(long)]
    pub inbox: Option<PathBuf>,

    /// Directory receiving the generated workbooks
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Polling interval in seconds for watch mode
    #[arg(long)]
    pub interval: Option<u64>,

    /// Process the inbox once and exit instead of monitoring
    #[arg(long)]
    pub once: bool,

    /// Process a single report file (classified by name) and exit
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Settings resolved from CLI flags, the optional TOML file and the
/// built-in defaults, in that precedence order. Read-only during a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub inbox: PathBuf,
    pub output: PathBuf,
    pub interval: Duration,
    pub branches: BranchMap,
}

impl Settings {
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };

        let inbox = cli
            .inbox
            .clone()
            .or_else(|| file.as_ref().and_then(TomlConfig::inbox))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INBOX));
        let output = cli
            .output
            .clone()
            .or_else(|| file.as_ref().and_then(TomlConfig::output_dir))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let interval_secs = cli
            .interval
            .or_else(|| file.as_ref().and_then(TomlConfig::interval_seconds))
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        let branches = file
            .as_ref()
            .and_then(TomlConfig::branch_map)
            .unwrap_or_default();

        let settings = Self {
            inbox,
            output,
            interval: Duration::from_secs(interval_secs),
            branches,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("inbox", &self.inbox)?;
        validate_path("output", &self.output)?;
        validate_positive_number("interval", self.interval.as_secs(), 1)?;
        Ok(())
    }
}
