pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{prepare_engine, StatsEngine};
pub use adapters::{DryRunPublisher, KaggleCliPublisher, LocalStorage};
pub use config::{Credentials, PipelineConfig, Season};
pub use core::{etl::EtlEngine, fetcher::HttpTableSource, pipeline::StatsPipeline};
pub use utils::error::{EtlError, Result};
