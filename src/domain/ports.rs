use crate::domain::model::{RawTable, TableSet, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;

    fn base_path(&self) -> &Path;
}

/// 一個要抓取的來源：網址與頁面中表格的 id
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceSpec {
    pub url: String,
    pub table_id: String,
}

impl SourceSpec {
    pub fn new(url: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            table_id: table_id.into(),
        }
    }
}

/// 單一來源的抓取失敗，只會被記錄，不會中止整次執行
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("no table with id '{0}' in the page")]
    TableNotFound(String),

    #[error("could not parse table: {0}")]
    Parse(String),
}

/// 每次抓取的結果，成功帶表格，失敗帶原因
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(RawTable),
    Failed { table_id: String, error: FetchError },
}

#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch(&self, source: &SourceSpec) -> FetchOutcome;
}

/// 外部發佈服務；只知道資料夾與版本說明
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, dir: &Path, version_notes: &str) -> Result<()>;
}

/// 寫出的三個檔案
#[derive(Debug, Clone)]
pub struct ExportedArtifacts {
    pub directory: PathBuf,
    pub full_csv: PathBuf,
    pub light_csv: PathBuf,
    pub metadata: PathBuf,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<TableSet>;
    async fn transform(&self, tables: TableSet) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<ExportedArtifacts>;
}
