use crate::core::{ExportedArtifacts, Pipeline, Publisher};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    publisher: Option<(Box<dyn Publisher>, String)>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            publisher: None,
        }
    }

    /// 三個檔案寫出後呼叫一次發佈
    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>, version_notes: impl Into<String>) -> Self {
        self.publisher = Some((publisher, version_notes.into()));
        self
    }

    pub async fn run(&self) -> Result<ExportedArtifacts> {
        tracing::info!("Starting data scraping...");

        // Extract
        let tables = self.pipeline.extract().await?;
        tracing::info!("Extracted {} tables: {}", tables.len(), tables.ids().join(", "));

        // Transform
        let result = self.pipeline.transform(tables).await?;
        tracing::info!(
            "Transformed {} players ({} full columns, {} light columns)",
            result.full.row_count(),
            result.full.column_count(),
            result.light.column_count()
        );

        // Load
        let artifacts = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", artifacts.directory.display());

        // Publish
        if let Some((publisher, notes)) = &self.publisher {
            publisher.publish(&artifacts.directory, notes).await?;
        }

        Ok(artifacts)
    }
}
