use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use omnihive::app::Application;
use omnihive::shutdown::ShutdownManager;
use omnihive_config::{AppConfig, LogLevel, OutputFormat};
use omnihive_core::init_logging;
use tokio::signal;
use tracing::{error, info, warn};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("omnihive")
        .version(env!("CARGO_PKG_VERSION"))
        .about("OmniHive worker host")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Overrides logging.level")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("Overrides logging.format")
                .value_parser(["json", "pretty", "text"]),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Validate the configuration, boot all workers once and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config");
    let check_only = matches.get_flag("check");

    let mut config = AppConfig::load(config_path.map(String::as_str)).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config_path.map(String::as_str).unwrap_or("default locations")
        )
    })?;

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.logging.format = format.parse::<OutputFormat>().map_err(anyhow::Error::msg)?;
    }

    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting OmniHive worker host");
    if let Some(path) = config_path {
        info!("Configuration file: {path}");
    }

    let app = Arc::new(Application::new(config));
    let report = app.boot().await?;
    info!(
        "{} hive workers registered, {} skipped, {} degraded",
        report.registered.len(),
        report.skipped.len(),
        report.after_init_failures.len()
    );

    if check_only {
        info!("Configuration check passed");
        return app.stop().await;
    }

    let shutdown_manager = ShutdownManager::new();

    let app_handle = {
        let shutdown_rx = shutdown_manager.subscribe().await;
        let app = Arc::clone(&app);

        tokio::spawn(async move {
            if let Err(e) = app.run(shutdown_rx).await {
                error!("Application shutdown failed: {e:#}");
            }
        })
    };

    wait_for_shutdown_signal().await;

    info!("Shutdown signal received, stopping gracefully...");
    shutdown_manager.shutdown().await;

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, app_handle).await {
        Ok(Ok(())) => info!("All hive workers disposed"),
        Ok(Err(e)) => error!("Shutdown task failed: {e}"),
        Err(_) => warn!("Shutdown timed out, exiting anyway"),
    }

    info!("OmniHive worker host stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
