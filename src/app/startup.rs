use crate::adapters::{DryRunPublisher, KaggleCliPublisher, LocalStorage};
use crate::config::{Credentials, PipelineConfig};
use crate::core::etl::EtlEngine;
use crate::core::fetcher::HttpTableSource;
use crate::core::pipeline::StatsPipeline;
use crate::core::Publisher;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

pub type StatsEngine = EtlEngine<StatsPipeline<LocalStorage>>;

/// 組出可執行的 engine，不會發出任何網路請求
///
/// 順序：驗證設定 → 需要發佈時讀取憑證 → 建立 HTTP 來源與儲存。
/// 任何一步失敗都在抓取前回傳錯誤。
pub fn prepare_engine<F>(config: PipelineConfig, publish: bool, lookup: F) -> Result<StatsEngine>
where
    F: Fn(&str) -> Option<String>,
{
    config.validate()?;

    let publisher: Box<dyn Publisher> = if publish {
        let credentials = Credentials::from_lookup(lookup)?;
        tracing::info!("🔑 Kaggle credentials found for {}", credentials.username);
        Box::new(KaggleCliPublisher::new(credentials))
    } else {
        tracing::info!("📦 Publishing disabled; files will only be written locally");
        Box::new(DryRunPublisher)
    };

    let source = HttpTableSource::new(&config.fetch, config.identity_column.clone())?;
    let storage = LocalStorage::new(config.export.output_dir.clone());
    let version_notes = config.metadata.version_notes.clone();
    let pipeline = StatsPipeline::new(Box::new(source), storage, config);

    Ok(EtlEngine::new(pipeline).with_publisher(publisher, version_notes))
}

/// 從行程環境變數讀取憑證
pub fn prepare_engine_from_env(config: PipelineConfig, publish: bool) -> Result<StatsEngine> {
    prepare_engine(config, publish, |name| std::env::var(name).ok())
}
