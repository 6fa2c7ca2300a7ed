use crate::config::FetchSettings;
use crate::core::html_table::parse_table;
use crate::domain::model::RawTable;
use crate::domain::ports::{FetchError, FetchOutcome, SourceSpec, TableSource};
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

/// 透過 HTTP 抓取頁面並解析指定表格
pub struct HttpTableSource {
    client: Client,
    identity_column: String,
}

impl HttpTableSource {
    pub fn new(settings: &FetchSettings, identity_column: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            identity_column: identity_column.into(),
        })
    }

    async fn fetch_table(&self, source: &SourceSpec) -> std::result::Result<RawTable, FetchError> {
        tracing::debug!("Requesting {} for table {}", source.url, source.table_id);
        let response = self.client.get(&source.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        parse_table(&body, &source.table_id, &self.identity_column)
    }
}

#[async_trait::async_trait]
impl TableSource for HttpTableSource {
    async fn fetch(&self, source: &SourceSpec) -> FetchOutcome {
        match self.fetch_table(source).await {
            Ok(raw) => {
                tracing::info!(
                    "✅ Retrieved {} ({} rows, {} columns)",
                    raw.id,
                    raw.table.row_count(),
                    raw.table.column_count()
                );
                FetchOutcome::Fetched(raw)
            }
            Err(error) => {
                tracing::warn!("⚠️ Error retrieving {}: {}", source.table_id, error);
                FetchOutcome::Failed {
                    table_id: source.table_id.clone(),
                    error,
                }
            }
        }
    }
}
