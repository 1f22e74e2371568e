use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::info;

use wordtally::Coordinator;
use wordtally::cli::Cli;
use wordtally::config::Config;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (WARN)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    // stdout carries the reports, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to setup logging: {e}"))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log level is read early so config fallback warnings have a subscriber
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("wordtally starting");

    let coordinator = Coordinator::new(cli.apply_overrides(config.coordinator))?;
    let sources = coordinator
        .acquire(&cli.sources)
        .context("Failed to acquire input sources")?;

    let summary = coordinator
        .run(sources, std::io::stdout())
        .await
        .context("Word count aborted")?;

    for reader in &summary.readers {
        if reader.read_failed {
            info!(source = %reader.source, "Source ended on a read error");
        }
    }
    info!(
        distinct_words = summary.distinct_words,
        total = summary.total_occurrences,
        "wordtally finished"
    );

    Ok(())
}
