#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{AppConfig, DEFAULT_API_URL};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio content client: public view and admin panel")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Backend base URL, overrides FOLIO_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Print JSON instead of text")]
    pub json: bool,

    #[arg(short = 'y', long, global = true, help = "Answer yes to confirmation prompts")]
    pub yes: bool,

    #[command(subcommand)]
    pub command: cli::Command,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Config file, then `FOLIO_API_URL`, then `--api-url`; validated.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_env();
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
