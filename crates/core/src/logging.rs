use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use omnihive_config::{LogConfig, OutputFormat};
use omnihive_foundation::{HiveError, HiveResult};

/// Installs the global subscriber. `RUST_LOG` takes precedence over `config.level`.
pub fn init_logging(config: &LogConfig) -> HiveResult<()> {
    let env_filter = build_filter(config);
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        OutputFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        OutputFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        OutputFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
    };

    result.map_err(|e| HiveError::config_error(format!("Failed to initialize logging: {e}")))
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}
