use crate::config::toml_config::TomlConfig;
use crate::config::{PipelineConfig, Season};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "fbref-etl")]
#[command(about = "Scrape FBref Big 5 player tables, merge them and publish a Kaggle dataset")]
pub struct CliConfig {
    /// Path to a TOML configuration file (built-in FBref settings when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Season such as 2025_2026 (defaults to the season of today's date).
    /// Changes file names, title and notes; the dataset id stays fixed unless
    /// `metadata.dataset_id` is set in the config file
    #[arg(long)]
    pub season: Option<String>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Keep the raw "years-days" Age values
    #[arg(long)]
    pub no_age_normalization: bool,

    /// Omit column descriptions from dataset-metadata.json
    #[arg(long)]
    pub no_column_descriptions: bool,

    /// Write the files but do not upload them
    #[arg(long)]
    pub no_publish: bool,

    #[arg(long)]
    pub min_delay_ms: Option<u64>,

    #[arg(long)]
    pub max_delay_ms: Option<u64>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub version_notes: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 設定檔 (或內建設定) 加上命令列覆蓋
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let season = self.season.as_deref().map(Season::parse).transpose()?;
        let toml = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let mut config = toml.into_pipeline_config(season)?;

        if let Some(dir) = &self.output_dir {
            config.export.output_dir = dir.clone();
        }
        if self.no_age_normalization {
            config.transform.normalize_age = false;
        }
        if self.no_column_descriptions {
            config.metadata.include_column_descriptions = false;
        }
        if let Some(ms) = self.min_delay_ms {
            config.fetch.delay_min_ms = ms;
        }
        if let Some(ms) = self.max_delay_ms {
            config.fetch.delay_max_ms = ms;
        }
        if let Some(secs) = self.timeout_seconds {
            config.fetch.timeout_seconds = secs;
        }
        if let Some(notes) = &self.version_notes {
            config.metadata.version_notes = notes.clone();
        }

        Ok(config)
    }

    pub fn publish_enabled(&self) -> bool {
        !self.no_publish && !self.dry_run
    }
}
