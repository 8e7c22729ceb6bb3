//! Command line and environment configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::TypedValueParser as _;
use clap::Parser;

use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::seed::SeedSource;

/// Directory name under the platform data dir
const APP_DIR: &str = "project-tracker";

/// Terminal project tracker
#[derive(Parser, Debug)]
#[command(name = "tracker-tui")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the projects slot file
    #[arg(long, env = "TRACKER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seed document (file path or http(s) URL) used when no saved data exists
    #[arg(long, env = "TRACKER_SEED")]
    pub seed: Option<String>,

    /// Projects per chart page
    #[arg(
        long,
        env = "TRACKER_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    pub page_size: usize,

    /// Log directory (defaults to <data-dir>/logs)
    #[arg(long, env = "TRACKER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub seed: SeedSource,
    pub page_size: usize,
}

impl Args {
    pub fn resolve(self) -> Result<Config> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .context("Could not determine data directory, pass --data-dir")?,
        };
        let log_dir = self.log_dir.unwrap_or_else(|| data_dir.join("logs"));
        let seed = self
            .seed
            .as_deref()
            .map(SeedSource::parse)
            .unwrap_or_default();

        Ok(Config {
            data_dir,
            log_dir,
            seed,
            page_size: self.page_size,
        })
    }
}

impl Config {
    /// Parse process arguments and environment
    pub fn load() -> Result<Self> {
        Args::parse().resolve()
    }
}
