use crate::config::PipelineConfig;
use crate::core::cleaner::Cleaner;
use crate::core::exporter::{build_metadata, export};
use crate::core::merger::{merge_tables, MergeKeys};
use crate::core::projector::project;
use crate::core::table_set::build_table_set;
use crate::core::{ExportedArtifacts, Pipeline, Storage, TableSet, TableSource, TransformResult};
use crate::utils::error::Result;

/// 抓取 → 合併 → 清理 → 投影 → 輸出
pub struct StatsPipeline<S: Storage> {
    source: Box<dyn TableSource>,
    storage: S,
    config: PipelineConfig,
}

impl<S: Storage> StatsPipeline<S> {
    pub fn new(source: Box<dyn TableSource>, storage: S, config: PipelineConfig) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    fn merge_keys(&self) -> MergeKeys<'_> {
        MergeKeys {
            primary_table: &self.config.primary_table,
            entity_column: &self.config.entity_column,
            group_column: &self.config.group_column,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for StatsPipeline<S> {
    async fn extract(&self) -> Result<TableSet> {
        tracing::info!(
            "🌐 Fetching {} tables for season {}",
            self.config.sources.len(),
            self.config.season
        );
        Ok(build_table_set(self.source.as_ref(), &self.config.sources, &self.config.fetch).await)
    }

    async fn transform(&self, tables: TableSet) -> Result<TransformResult> {
        let merged = merge_tables(tables, &self.merge_keys())?;
        let full = Cleaner::new(self.config.transform.normalize_age).apply(merged);
        let light = project(&full, &self.config.light_columns)?;
        Ok(TransformResult { full, light })
    }

    async fn load(&self, result: TransformResult) -> Result<ExportedArtifacts> {
        let metadata = build_metadata(&self.config.metadata, &self.config.export);
        let bundle = export(&result.full, &result.light, &metadata, &self.config.export)?;

        let full_csv = self
            .storage
            .write_file(&bundle.full_csv.name, &bundle.full_csv.bytes)
            .await?;
        let light_csv = self
            .storage
            .write_file(&bundle.light_csv.name, &bundle.light_csv.bytes)
            .await?;
        let metadata = self
            .storage
            .write_file(&bundle.metadata.name, &bundle.metadata.bytes)
            .await?;

        Ok(ExportedArtifacts {
            directory: self.storage.base_path().to_path_buf(),
            full_csv,
            light_csv,
            metadata,
        })
    }
}
