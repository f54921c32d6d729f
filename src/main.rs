use autocalendar::calendar::EventSettings;
use autocalendar::config::toml_config::TomlConfig;
use autocalendar::core::Pipeline;
use autocalendar::utils::error::ErrorSeverity;
use autocalendar::utils::{logger, validation::Validate};
use autocalendar::{CliConfig, JsonOutbox, LocalStorage, SchedulePipeline, SchedulerEngine};
use clap::Parser;

const OUTBOX_FILE: &str = "event_outbox.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting autocalendar");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // Optional TOML file supplies event settings and poll overrides
    let mut settings = EventSettings::default();
    let mut directory_file = None;
    if let Some(path) = config.config.clone() {
        tracing::info!("Loading configuration from: {}", path);
        let toml_config = match TomlConfig::from_file(&path) {
            Ok(toml_config) => toml_config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        };
        if let Err(e) = toml_config.validate() {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
        config.apply_toml(&toml_config);
        settings = toml_config.event_settings();
        directory_file = toml_config.directory_file();
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // One storage rooted at the working directory; the pipeline addresses
    // the poll, the directory file, and all outputs by relative path.
    let storage = LocalStorage::new(".".to_string());
    let sink = JsonOutbox::new(
        LocalStorage::new(".".to_string()),
        format!("{}/{}", config.output_path, OUTBOX_FILE),
    );
    let pipeline = SchedulePipeline::new(storage, config.clone(), sink, settings, directory_file);

    if config.dry_run {
        tracing::info!("DRY RUN - poll will be parsed but not allocated");
        let matrix = pipeline.extract().await?;
        println!(
            "Poll '{}': {} participants, {} slots",
            config.poll_file,
            matrix.participants().len(),
            matrix.slots().len()
        );
        for (col, slot) in matrix.slots().iter().enumerate() {
            println!("  {} ({} selections)", slot, matrix.selectors_of(col).len());
        }
        return Ok(());
    }

    let engine = SchedulerEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("Scheduling completed");
            println!("✅ Scheduling completed");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Scheduling failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
