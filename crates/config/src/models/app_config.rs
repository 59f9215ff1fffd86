use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use omnihive_foundation::{DuplicatePolicy, WorkerDescriptor};

use super::{logging::LogConfig, registry::RegistryConfig, server::ServerConfig};
use crate::validation::ConfigValidator;

pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/omnihive.toml",
    "omnihive.toml",
    "/etc/omnihive/config.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LogConfig,
    pub registry: RegistryConfig,
    pub workers: Vec<WorkerDescriptor>,
}

impl AppConfig {
    /// Loads the configuration from `config_path`, or from the first default
    /// path that exists, then applies `OMNIHIVE_*` environment overrides
    /// (`OMNIHIVE_LOGGING__LEVEL=debug`).
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, file_format(path)));
            } else {
                return Err(anyhow::anyhow!("Configuration file not found: {}", path));
            }
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("OMNIHIVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(json_str).context("Failed to parse JSON configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    pub fn enabled_workers(&self) -> impl Iterator<Item = &WorkerDescriptor> {
        self.workers.iter().filter(|worker| worker.enabled)
    }
}

fn file_format(path: &str) -> FileFormat {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("json") => FileFormat::Json,
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        _ => FileFormat::Toml,
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        self.server.validate()?;
        self.logging.validate()?;
        self.registry.validate()?;

        let mut seen = HashSet::new();
        for worker in &self.workers {
            worker
                .validate()
                .map_err(|e| crate::ConfigError::Validation(e.to_string()))?;

            if !seen.insert(worker.name.as_str())
                && self.registry.duplicate_policy == DuplicatePolicy::Reject
            {
                return Err(crate::ConfigError::Validation(format!(
                    "Hive worker {} is declared more than once",
                    worker.name
                )));
            }
        }
        Ok(())
    }
}
