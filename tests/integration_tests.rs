use async_trait::async_trait;
use fbref_etl::config::defaults;
use fbref_etl::core::{Publisher, SourceSpec};
use fbref_etl::{
    EtlEngine, EtlError, HttpTableSource, LocalStorage, PipelineConfig, Season, StatsPipeline,
};
use httpmock::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const STANDARD_PAGE: &str = r#"
<html><body>
<table id="stats_standard">
  <thead>
    <tr><th colspan="4"></th><th colspan="2">Performance</th></tr>
    <tr><th>Rk</th><th>Player</th><th>Squad</th><th>Age</th><th>Gls</th><th>Matches</th></tr>
  </thead>
  <tbody>
    <tr><th>1</th><td><a href="/p/1">Bukayo Saka</a></td><td>Arsenal</td><td>23-330</td><td>10</td><td>Matches</td></tr>
    <tr class="thead"><th>Rk</th><th>Player</th><th>Squad</th><th>Age</th><th>Gls</th><th>Matches</th></tr>
    <tr><th>2</th><td>Cole Palmer</td><td>Chelsea</td><td>23-120</td><td>22</td><td>Matches</td></tr>
    <tr><th>3</th><td>Jonathan David</td><td>Lille</td><td>25-010</td><td>26</td><td>Matches</td></tr>
  </tbody>
</table>
</body></html>
"#;

// 次要表格包在 HTML 註解中
const SHOOTING_PAGE: &str = r#"
<html><body>
<div id="all_stats_shooting">
<!--
<table id="stats_shooting">
  <thead>
    <tr><th>Player</th><th>Squad</th><th>Gls</th><th>Sh</th><th>Matches</th></tr>
  </thead>
  <tbody>
    <tr><td>Bukayo Saka</td><td>Arsenal</td><td>10</td><td>60</td><td>Matches</td></tr>
    <tr><td>Cole Palmer</td><td>Chelsea</td><td>22</td><td>90</td><td>Matches</td></tr>
  </tbody>
</table>
-->
</div>
</body></html>
"#;

#[derive(Clone, Default)]
struct RecordingPublisher {
    calls: Arc<Mutex<Vec<(PathBuf, String, usize)>>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, dir: &Path, version_notes: &str) -> fbref_etl::Result<()> {
        let files = std::fs::read_dir(dir)?.count();
        self.calls
            .lock()
            .unwrap()
            .push((dir.to_path_buf(), version_notes.to_string(), files));
        Ok(())
    }
}

fn mock_pages(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/stats");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(STANDARD_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/shooting");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(SHOOTING_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/defense");
        then.status(500);
    });
}

fn test_config(server: &MockServer, output_dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::fbref_big5(Season::new(2025));
    config.sources = vec![
        SourceSpec::new(server.url("/stats"), "stats_standard"),
        SourceSpec::new(server.url("/shooting"), "stats_shooting"),
        SourceSpec::new(server.url("/defense"), "stats_defense"),
    ];
    config.light_columns = ["Player", "Squad", "Age", "Sh", "Gls_stats_shooting"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    config.fetch.delay_min_ms = 0;
    config.fetch.delay_max_ms = 0;
    config.fetch.timeout_seconds = 5;
    config.export.output_dir = output_dir.to_path_buf();
    config
}

fn engine_for(
    config: PipelineConfig,
    publisher: RecordingPublisher,
) -> EtlEngine<StatsPipeline<LocalStorage>> {
    let source = HttpTableSource::new(&config.fetch, config.identity_column.clone()).unwrap();
    let storage = LocalStorage::new(config.export.output_dir.clone());
    let notes = config.metadata.version_notes.clone();
    let pipeline = StatsPipeline::new(Box::new(source), storage, config);
    EtlEngine::new(pipeline).with_publisher(Box::new(publisher), notes)
}

#[tokio::test]
async fn test_end_to_end_with_mock_fbref() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("kaggle_upload");
    let server = MockServer::start();
    mock_pages(&server);

    let publisher = RecordingPublisher::default();
    let engine = engine_for(test_config(&server, &output_dir), publisher.clone());

    let artifacts = engine.run().await.unwrap();

    assert_eq!(artifacts.directory, output_dir);
    assert_eq!(artifacts.full_csv, output_dir.join("players_data-2025_2026.csv"));
    assert_eq!(artifacts.light_csv, output_dir.join("players_data_light-2025_2026.csv"));
    assert_eq!(artifacts.metadata, output_dir.join("dataset-metadata.json"));

    let full = std::fs::read_to_string(&artifacts.full_csv).unwrap();
    let lines: Vec<&str> = full.lines().collect();
    assert_eq!(lines[0], "Rk,Player,Squad,Age,Gls,Gls_stats_shooting,Sh");
    assert_eq!(lines[1], "1,Bukayo Saka,Arsenal,23,10,10,60");
    assert_eq!(lines[2], "2,Cole Palmer,Chelsea,23,22,22,90");
    assert_eq!(lines[3], "3,Jonathan David,Lille,25,26,,");
    assert_eq!(lines.len(), 4);

    let light = std::fs::read_to_string(&artifacts.light_csv).unwrap();
    assert_eq!(
        light,
        "Player,Squad,Age,Sh,Gls_stats_shooting\n\
         Bukayo Saka,Arsenal,23,60,10\n\
         Cole Palmer,Chelsea,23,90,22\n\
         Jonathan David,Lille,25,,\n"
    );

    let metadata: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&artifacts.metadata).unwrap()).unwrap();
    assert_eq!(metadata["title"], "Football Players Stats 2025-2026");
    assert_eq!(metadata["files"][0]["name"], "players_data-2025_2026.csv");
    assert_eq!(metadata["files"][1]["name"], "players_data_light-2025_2026.csv");
    assert_eq!(
        metadata["columns"].as_array().unwrap().len(),
        defaults::COLUMN_DESCRIPTIONS.len()
    );

    // 三個檔案寫出後才發佈，而且只發佈一次
    let calls = publisher.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, output_dir);
    assert!(calls[0].1.contains("2025/2026"));
    assert_eq!(calls[0].2, 3);
}

#[tokio::test]
async fn test_missing_primary_table_aborts_before_export() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");
    let server = MockServer::start();
    let standard = server.mock(|when, then| {
        when.method(GET).path("/stats");
        then.status(200).body("<html><body><p>maintenance</p></body></html>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/shooting");
        then.status(200).body(SHOOTING_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/defense");
        then.status(500);
    });

    let publisher = RecordingPublisher::default();
    let engine = engine_for(test_config(&server, &output_dir), publisher.clone());

    let err = engine.run().await.unwrap_err();

    standard.assert();
    assert!(matches!(err, EtlError::MissingPrimaryTable { ref table } if table == "stats_standard"));
    assert_ne!(err.exit_code(), 0);
    assert!(!output_dir.exists());
    assert!(publisher.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_schema_drift_fails_projection() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");
    let server = MockServer::start();
    mock_pages(&server);

    let mut config = test_config(&server, &output_dir);
    config.light_columns.push("xG".to_string());

    let engine = engine_for(config, RecordingPublisher::default());
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::MissingColumn { ref column, .. } if column == "xG"));
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_age_normalization_can_be_disabled() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_pages(&server);

    let mut config = test_config(&server, temp_dir.path());
    config.transform.normalize_age = false;

    let artifacts = engine_for(config, RecordingPublisher::default())
        .run()
        .await
        .unwrap();

    let light = std::fs::read_to_string(&artifacts.light_csv).unwrap();
    assert!(light.contains("Bukayo Saka,Arsenal,23-330,60,10"));
}

#[tokio::test]
async fn test_repeated_runs_produce_identical_files() {
    let server = MockServer::start();
    mock_pages(&server);

    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let first = engine_for(test_config(&server, first_dir.path()), RecordingPublisher::default())
        .run()
        .await
        .unwrap();
    let second = engine_for(test_config(&server, second_dir.path()), RecordingPublisher::default())
        .run()
        .await
        .unwrap();

    for (a, b) in [
        (&first.full_csv, &second.full_csv),
        (&first.light_csv, &second.light_csv),
        (&first.metadata, &second.metadata),
    ] {
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }
}
