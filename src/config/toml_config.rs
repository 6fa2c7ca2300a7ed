use crate::config::{PipelineConfig, Season};
use crate::domain::model::ColumnDescription;
use crate::domain::ports::SourceSpec;
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML 設定檔；未填寫的部分沿用內建 FBref 設定
///
/// 檔名類設定可使用 `{season}`（如 `2025_2026`）與 `{season_label}`（如 `2025-2026`）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub season: Option<String>,
    pub light_columns: Option<Vec<String>>,
    pub pipeline: Option<PipelineSection>,
    pub sources: Option<Vec<SourceSpec>>,
    pub fetch: Option<FetchSection>,
    pub transform: Option<TransformSection>,
    pub export: Option<ExportSection>,
    pub metadata: Option<MetadataSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    pub primary_table: Option<String>,
    pub entity_column: Option<String>,
    pub group_column: Option<String>,
    pub identity_column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchSection {
    pub delay_min_ms: Option<u64>,
    pub delay_max_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformSection {
    pub normalize_age: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    pub output_dir: Option<PathBuf>,
    pub full_file_name: Option<String>,
    pub light_file_name: Option<String>,
    pub metadata_file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataSection {
    pub title: Option<String>,
    pub dataset_id: Option<String>,
    pub license: Option<String>,
    pub include_column_descriptions: Option<bool>,
    pub columns: Option<Vec<ColumnDescription>>,
    pub full_file_description: Option<String>,
    pub light_file_description: Option<String>,
    pub version_notes: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FBREF_OUTPUT_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 設定檔中的賽季；沒有時回傳 None
    pub fn season(&self) -> Result<Option<Season>> {
        self.season.as_deref().map(Season::parse).transpose()
    }

    /// 疊加在內建設定上，產生最終的 PipelineConfig
    pub fn into_pipeline_config(self, season_override: Option<Season>) -> Result<PipelineConfig> {
        let season = match season_override {
            Some(season) => season,
            None => self.season()?.unwrap_or_else(Season::current),
        };
        let mut config = PipelineConfig::fbref_big5(season);
        let fill = |template: String| expand_season(&template, season);

        if let Some(p) = self.pipeline {
            if let Some(v) = p.primary_table {
                config.primary_table = v;
            }
            if let Some(v) = p.entity_column {
                config.entity_column = v;
            }
            if let Some(v) = p.group_column {
                config.group_column = v;
            }
            if let Some(v) = p.identity_column {
                config.identity_column = v;
            }
        }
        if let Some(sources) = self.sources {
            config.sources = sources;
        }
        if let Some(columns) = self.light_columns {
            config.light_columns = columns;
        }
        if let Some(f) = self.fetch {
            if let Some(v) = f.delay_min_ms {
                config.fetch.delay_min_ms = v;
            }
            if let Some(v) = f.delay_max_ms {
                config.fetch.delay_max_ms = v;
            }
            if let Some(v) = f.timeout_seconds {
                config.fetch.timeout_seconds = v;
            }
            if let Some(v) = f.user_agent {
                config.fetch.user_agent = v;
            }
        }
        if let Some(t) = self.transform {
            if let Some(v) = t.normalize_age {
                config.transform.normalize_age = v;
            }
        }
        if let Some(e) = self.export {
            if let Some(v) = e.output_dir {
                config.export.output_dir = v;
            }
            if let Some(v) = e.full_file_name {
                config.export.full_file_name = fill(v);
            }
            if let Some(v) = e.light_file_name {
                config.export.light_file_name = fill(v);
            }
            if let Some(v) = e.metadata_file_name {
                config.export.metadata_file_name = fill(v);
            }
        }
        if let Some(m) = self.metadata {
            if let Some(v) = m.title {
                config.metadata.title = fill(v);
            }
            if let Some(v) = m.dataset_id {
                config.metadata.dataset_id = fill(v);
            }
            if let Some(v) = m.license {
                config.metadata.license = v;
            }
            if let Some(v) = m.include_column_descriptions {
                config.metadata.include_column_descriptions = v;
            }
            if let Some(v) = m.columns {
                config.metadata.columns = v;
            }
            if let Some(v) = m.full_file_description {
                config.metadata.full_file_description = fill(v);
            }
            if let Some(v) = m.light_file_description {
                config.metadata.light_file_description = fill(v);
            }
            if let Some(v) = m.version_notes {
                config.metadata.version_notes = fill(v);
            }
        }

        Ok(config)
    }
}

fn expand_season(template: &str, season: Season) -> String {
    template
        .replace("{season_label}", &season.label())
        .replace("{season}", &season.file_token())
}

impl From<&PipelineConfig> for TomlConfig {
    /// 把設定寫回 TOML，方便 `--dry-run` 輸出目前生效的值
    fn from(config: &PipelineConfig) -> Self {
        Self {
            season: Some(config.season.file_token()),
            light_columns: Some(config.light_columns.clone()),
            pipeline: Some(PipelineSection {
                primary_table: Some(config.primary_table.clone()),
                entity_column: Some(config.entity_column.clone()),
                group_column: Some(config.group_column.clone()),
                identity_column: Some(config.identity_column.clone()),
            }),
            sources: Some(config.sources.clone()),
            fetch: Some(FetchSection {
                delay_min_ms: Some(config.fetch.delay_min_ms),
                delay_max_ms: Some(config.fetch.delay_max_ms),
                timeout_seconds: Some(config.fetch.timeout_seconds),
                user_agent: Some(config.fetch.user_agent.clone()),
            }),
            transform: Some(TransformSection {
                normalize_age: Some(config.transform.normalize_age),
            }),
            export: Some(ExportSection {
                output_dir: Some(config.export.output_dir.clone()),
                full_file_name: Some(config.export.full_file_name.clone()),
                light_file_name: Some(config.export.light_file_name.clone()),
                metadata_file_name: Some(config.export.metadata_file_name.clone()),
            }),
            metadata: Some(MetadataSection {
                title: Some(config.metadata.title.clone()),
                dataset_id: Some(config.metadata.dataset_id.clone()),
                license: Some(config.metadata.license.clone()),
                include_column_descriptions: Some(config.metadata.include_column_descriptions),
                columns: Some(config.metadata.columns.clone()),
                full_file_description: Some(config.metadata.full_file_description.clone()),
                light_file_description: Some(config.metadata.light_file_description.clone()),
                version_notes: Some(config.metadata.version_notes.clone()),
            }),
        }
    }
}
