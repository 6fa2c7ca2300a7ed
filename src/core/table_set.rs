use crate::config::FetchSettings;
use crate::domain::model::TableSet;
use crate::domain::ports::{FetchOutcome, SourceSpec, TableSource};
use rand::Rng;
use std::time::Duration;

/// 依序抓取所有來源；失敗的來源直接略過
///
/// 兩次抓取之間隨機等待 `delay_min_ms..=delay_max_ms`，兩者皆為 0 時不等待。
pub async fn build_table_set<T>(source: &T, sources: &[SourceSpec], settings: &FetchSettings) -> TableSet
where
    T: TableSource + ?Sized,
{
    let mut tables = TableSet::new();
    let mut failed = Vec::new();

    for (i, spec) in sources.iter().enumerate() {
        if i > 0 {
            politeness_delay(settings).await;
        }

        match source.fetch(spec).await {
            FetchOutcome::Fetched(raw) => tables.insert(raw),
            FetchOutcome::Failed { table_id, .. } => failed.push(table_id),
        }
    }

    if failed.is_empty() {
        tracing::info!("📥 Fetched all {} tables", tables.len());
    } else {
        tracing::warn!(
            "📥 Fetched {} of {} tables; skipped: {}",
            tables.len(),
            sources.len(),
            failed.join(", ")
        );
    }

    tables
}

async fn politeness_delay(settings: &FetchSettings) {
    let delay = pick_delay(settings.delay_min_ms, settings.delay_max_ms);
    if delay.is_zero() {
        return;
    }
    tracing::debug!("Sleeping {:?} before next request", delay);
    tokio::time::sleep(delay).await;
}

fn pick_delay(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let ms = if min_ms >= max_ms {
        min_ms
    } else {
        rand::thread_rng().gen_range(min_ms..=max_ms)
    };
    Duration::from_millis(ms)
}
