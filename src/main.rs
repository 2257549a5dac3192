//! Playtrack demo host.
//!
//! Simulates one playback session against a single engine: the console
//! logger is registered globally before the engine exists, a second logger
//! joins mid-session and catches up from the journal, and the engine is torn
//! down at the end.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt};

use playtrack_core::config::AppConfig;
use playtrack_core::config::logging::LoggingConfig;
use playtrack_core::events::taxonomy;
use playtrack_plugin::{Framework, register_plugin_factory};
use plugin_console_logger::{ConsoleLoggerPlugin, PLUGIN_NAME, SessionStats};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "playtrack-demo", about = "Run a simulated playback session")]
struct Cli {
    /// Explicit configuration file. Overrides `--env`.
    #[arg(long)]
    config: Option<String>,
    /// Environment overlay to load from `config/{env}.toml`.
    #[arg(long, default_value = "development")]
    env: String,
    /// Number of playhead updates to publish.
    #[arg(long, default_value_t = 10)]
    ticks: u32,
    /// Milliseconds between playhead updates.
    #[arg(long, default_value_t = 250)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config, &cli).await {
        tracing::error!("Session error: {e:#}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(cli: &Cli) -> anyhow::Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config file '{path}'"))?,
        None => AppConfig::load(&cli.env)
            .with_context(|| format!("loading config for env '{}'", cli.env))?,
    };
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Drive one simulated playback session
async fn run(config: AppConfig, cli: &Cli) -> anyhow::Result<()> {
    tracing::info!("Starting Playtrack demo v{}", env!("CARGO_PKG_VERSION"));

    // Registered before any engine exists; the engine picks it up on creation.
    let global_stats = Arc::new(SessionStats::new());
    register_plugin_factory(ConsoleLoggerPlugin::factory(global_stats.clone()));

    let framework = Framework::new(config.framework);
    framework.set_plugin_metadata(json!({
        PLUGIN_NAME: { "verbose": true, "ignore": [taxonomy::VIDEO_STREAM_DOWNLOADING] }
    }));

    framework.publish_event(taxonomy::VIDEO_PLAYER_CREATED, json!([{ "playerVersion": "demo" }]));
    framework.publish_event(
        taxonomy::VIDEO_CONTENT_METADATA_UPDATED,
        json!([{ "title": "Demo Stream", "duration": cli.ticks }]),
    );
    framework.publish_event(taxonomy::INITIAL_PLAYBACK_REQUESTED, json!([]));
    framework.publish_event(taxonomy::VIDEO_PLAYING, json!([]));

    // Joins mid-session and replays the journal in `init`.
    let late_stats = Arc::new(SessionStats::new());
    let late_id = framework
        .try_register_plugin(&ConsoleLoggerPlugin::factory(late_stats.clone()))
        .context("registering late console logger")?;
    tracing::info!(plugin_id = %late_id, replayed = late_stats.replayed(), "Late plugin caught up");

    let mut interval = tokio::time::interval(Duration::from_millis(cli.interval_ms));
    for tick in 0..cli.ticks {
        tokio::select! {
            _ = interval.tick() => {
                framework.publish_event(
                    taxonomy::VIDEO_STREAM_POSITION_CHANGED,
                    json!([tick, cli.ticks]),
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted; ending session early");
                break;
            }
        }
    }

    framework.publish_event(taxonomy::VIDEO_CONTENT_COMPLETED, json!([]));
    framework.publish_event(taxonomy::DESTROY, json!([]));

    tracing::info!(
        recorded = framework.recorded_events().len(),
        global_live = global_stats.live(),
        late_live = late_stats.live(),
        late_replayed = late_stats.replayed(),
        "Session finished"
    );

    framework.destroy();
    Ok(())
}
