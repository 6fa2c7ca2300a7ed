use fbref_etl::config::credentials::{KEY_VAR, USERNAME_VAR};
use fbref_etl::core::SourceSpec;
use fbref_etl::{prepare_engine, EtlError, PipelineConfig, Season};
use httpmock::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const PAGE: &str = r#"
<html><body>
<table id="stats_standard">
  <thead><tr><th>Player</th><th>Squad</th><th>Age</th></tr></thead>
  <tbody><tr><td>Martin Ødegaard</td><td>Arsenal</td><td>26-100</td></tr></tbody>
</table>
</body></html>
"#;

fn config_for(server: &MockServer, output_dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::fbref_big5(Season::new(2025));
    config.sources = vec![SourceSpec::new(server.url("/stats"), "stats_standard")];
    config.light_columns = vec!["Player".to_string(), "Age".to_string()];
    config.fetch.delay_min_ms = 0;
    config.fetch.delay_max_ms = 0;
    config.export.output_dir = output_dir.to_path_buf();
    config
}

fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |name| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    }
}

#[tokio::test]
async fn test_missing_credentials_fail_before_any_request() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/stats");
        then.status(200).body(PAGE);
    });

    let result = prepare_engine(config_for(&server, temp_dir.path()), true, env(&[]));

    let err = result.err().unwrap();
    assert!(matches!(err, EtlError::MissingCredentials { ref variable } if variable == USERNAME_VAR));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(page.hits(), 0);
    assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_blank_key_is_treated_as_missing() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/stats");
        then.status(200).body(PAGE);
    });

    let lookup = env(&[(USERNAME_VAR, "scout"), (KEY_VAR, "   ")]);
    let err = prepare_engine(config_for(&server, temp_dir.path()), true, lookup)
        .err()
        .unwrap();

    assert!(matches!(err, EtlError::MissingCredentials { ref variable } if variable == KEY_VAR));
    assert_eq!(page.hits(), 0);
}

#[tokio::test]
async fn test_invalid_config_is_reported_before_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let mut config = config_for(&server, temp_dir.path());
    config.primary_table = "stats_misc".to_string();

    let err = prepare_engine(config, true, env(&[])).err().unwrap();

    assert!(matches!(err, EtlError::ConfigValidationError { ref field, .. } if field == "pipeline.primary_table"));
}

#[tokio::test]
async fn test_publishing_disabled_needs_no_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/stats");
        then.status(200).body(PAGE);
    });

    let engine = prepare_engine(config_for(&server, temp_dir.path()), false, env(&[])).unwrap();
    assert_eq!(page.hits(), 0);

    let artifacts = engine.run().await.unwrap();

    assert_eq!(page.hits(), 1);
    let light = std::fs::read_to_string(&artifacts.light_csv).unwrap();
    assert_eq!(light, "Player,Age\nMartin Ødegaard,26\n");
}
