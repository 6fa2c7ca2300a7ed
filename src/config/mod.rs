#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod defaults;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use credentials::Credentials;

use crate::domain::model::ColumnDescription;
use crate::domain::ports::SourceSpec;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_unique, validate_url,
    Validate,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 賽季，例如 2025/2026 以起始年 2025 表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub start_year: i32,
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// 七月起算新賽季
    pub fn for_date(date: NaiveDate) -> Self {
        if date.month() >= 7 {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn current() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    /// 接受 "2025_2026"、"2025-2026"、"2025/2026" 或 "2025"
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| EtlError::InvalidConfigValueError {
            field: "season".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.trim().split(['_', '-', '/']).collect();
        let start: i32 = parts[0]
            .parse()
            .map_err(|_| invalid("season must start with a four digit year"))?;
        if !(1900..=2999).contains(&start) {
            return Err(invalid("season year out of range"));
        }
        match parts.as_slice() {
            [_] => Ok(Self::new(start)),
            [_, end] if end.parse::<i32>().ok() == Some(start + 1) => Ok(Self::new(start)),
            _ => Err(invalid("expected consecutive years such as 2025_2026")),
        }
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    /// 檔名用，例如 `2025_2026`
    pub fn file_token(&self) -> String {
        format!("{}_{}", self.start_year, self.end_year())
    }

    /// 標題用，例如 `2025-2026`
    pub fn label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start_year, self.end_year())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSettings {
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            delay_min_ms: 1000,
            delay_max_ms: 2000,
            timeout_seconds: 30,
            user_agent: format!("fbref-etl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSettings {
    pub normalize_age: bool,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            normalize_age: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub full_file_name: String,
    pub light_file_name: String,
    pub metadata_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSettings {
    pub title: String,
    pub dataset_id: String,
    pub license: String,
    pub include_column_descriptions: bool,
    pub columns: Vec<ColumnDescription>,
    pub full_file_description: String,
    pub light_file_description: String,
    pub version_notes: String,
}

/// 一次執行所需的全部設定，建立後不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub season: Season,
    pub sources: Vec<SourceSpec>,
    pub primary_table: String,
    pub entity_column: String,
    pub group_column: String,
    pub identity_column: String,
    pub light_columns: Vec<String>,
    pub fetch: FetchSettings,
    pub transform: TransformSettings,
    pub export: ExportSettings,
    pub metadata: MetadataSettings,
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "sources".to_string(),
                message: "at least one source is required".to_string(),
            });
        }
        for (i, source) in self.sources.iter().enumerate() {
            validate_url(&format!("sources[{}].url", i), &source.url)?;
            validate_non_empty_string(&format!("sources[{}].table_id", i), &source.table_id)?;
        }
        validate_unique("sources.table_id", self.sources.iter().map(|s| s.table_id.as_str()))?;

        if !self.sources.iter().any(|s| s.table_id == self.primary_table) {
            return Err(EtlError::ConfigValidationError {
                field: "pipeline.primary_table".to_string(),
                message: format!("'{}' is not among the configured sources", self.primary_table),
            });
        }

        validate_non_empty_string("pipeline.entity_column", &self.entity_column)?;
        validate_non_empty_string("pipeline.group_column", &self.group_column)?;
        validate_non_empty_string("pipeline.identity_column", &self.identity_column)?;

        if self.light_columns.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "light_columns".to_string(),
                message: "light column list cannot be empty".to_string(),
            });
        }
        validate_unique("light_columns", self.light_columns.iter().map(String::as_str))?;

        if self.fetch.delay_min_ms > self.fetch.delay_max_ms {
            return Err(EtlError::InvalidConfigValueError {
                field: "fetch.delay_min_ms".to_string(),
                value: self.fetch.delay_min_ms.to_string(),
                reason: format!("must not exceed delay_max_ms ({})", self.fetch.delay_max_ms),
            });
        }
        validate_positive_number("fetch.timeout_seconds", self.fetch.timeout_seconds as usize, 1)?;

        validate_path(
            "export.output_dir",
            &self.export.output_dir.to_string_lossy(),
        )?;
        validate_non_empty_string("export.full_file_name", &self.export.full_file_name)?;
        validate_non_empty_string("export.light_file_name", &self.export.light_file_name)?;
        validate_non_empty_string("export.metadata_file_name", &self.export.metadata_file_name)?;
        validate_unique(
            "export file names",
            [
                self.export.full_file_name.as_str(),
                self.export.light_file_name.as_str(),
                self.export.metadata_file_name.as_str(),
            ]
            .into_iter(),
        )?;

        validate_non_empty_string("metadata.dataset_id", &self.metadata.dataset_id)?;
        Ok(())
    }
}
