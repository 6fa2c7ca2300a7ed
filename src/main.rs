use anyhow::Context;
use clap::Parser;
use fbref_etl::config::toml_config::TomlConfig;
use fbref_etl::app::prepare_engine_from_env;
use fbref_etl::utils::{logger, validation::Validate};
use fbref_etl::{CliConfig, EtlError, PipelineConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting fbref-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    if cli.dry_run {
        if let Err(e) = config.validate() {
            fail(e);
        }
        print_plan(&config)?;
        return Ok(());
    }

    // 憑證與設定都在任何網路請求之前確認
    let engine = match prepare_engine_from_env(config, cli.publish_enabled()) {
        Ok(engine) => engine,
        Err(e) => fail(e),
    };

    match engine.run().await {
        Ok(artifacts) => {
            tracing::info!("✅ Pipeline completed successfully!");
            println!("✅ Pipeline completed successfully!");
            println!("📁 {}", artifacts.full_csv.display());
            println!("📁 {}", artifacts.light_csv.display());
            println!("📁 {}", artifacts.metadata.display());
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn fail(e: EtlError) -> ! {
    tracing::error!(
        "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_plan(config: &PipelineConfig) -> anyhow::Result<()> {
    println!("📋 Configuration Summary:");
    println!("  Season: {}", config.season);
    println!("  Sources: {}", config.sources.len());
    for source in &config.sources {
        println!("    {} <- {}", source.table_id, source.url);
    }
    println!("  Primary table: {}", config.primary_table);
    println!(
        "  Join key: ({}, {})",
        config.entity_column, config.group_column
    );
    println!("  Light columns: {}", config.light_columns.len());
    println!("  Age normalization: {}", config.transform.normalize_age);
    println!(
        "  Delay between requests: {}-{} ms",
        config.fetch.delay_min_ms, config.fetch.delay_max_ms
    );
    println!("  Output: {}", config.export.output_dir.display());
    println!();

    let effective = toml::to_string_pretty(&TomlConfig::from(config))
        .context("could not render effective configuration")?;
    println!("{}", effective);
    Ok(())
}
