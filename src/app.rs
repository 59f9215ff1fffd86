use std::sync::Arc;

use anyhow::{Context, Result};
use omnihive_config::AppConfig;
use omnihive_core::{
    DefaultWorkerRegistry, InitReport, LifecycleOptions, LifecycleOrchestrator, WorkerFactory,
};
use omnihive_foundation::WorkerRegistry;
use omnihive_worker::register_builtin_workers;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Hosts the worker registry for the lifetime of the process.
pub struct Application {
    config: AppConfig,
    orchestrator: LifecycleOrchestrator,
}

impl Application {
    /// Builds the application with only the built-in workers available.
    pub fn new(config: AppConfig) -> Self {
        let mut factory = WorkerFactory::new();
        register_builtin_workers(&mut factory);
        Self::with_factory(config, factory)
    }

    pub fn with_factory(config: AppConfig, factory: WorkerFactory) -> Self {
        let registry = Arc::new(DefaultWorkerRegistry::with_policy(
            config.registry.duplicate_policy,
        ));
        let orchestrator = LifecycleOrchestrator::with_options(
            registry,
            Arc::new(factory),
            LifecycleOptions::from(&config.registry),
        );

        Self {
            config,
            orchestrator,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<DefaultWorkerRegistry> {
        self.orchestrator.registry()
    }

    /// Initializes every configured worker. Any error aborts startup.
    pub async fn boot(&self) -> Result<InitReport> {
        info!(
            server = %self.config.server.name,
            environment = %self.config.server.environment,
            "Booting hive workers"
        );

        let report = self
            .orchestrator
            .init_workers(&self.config.workers)
            .await
            .context("Failed to initialize hive workers")?;

        for skipped in &report.skipped {
            info!(worker = %skipped, "Hive worker is disabled");
        }
        for failure in &report.after_init_failures {
            warn!(worker = %failure.worker, "Hive worker is degraded: {}", failure.error);
        }
        for (capability, count) in self.registry().count_by_type().await {
            info!(capability = %capability, count, "Registered hive workers");
        }

        Ok(report)
    }

    /// Waits for the shutdown signal, then disposes every registered worker.
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let _ = shutdown_rx.recv().await;
        info!("Shutdown signal received, disposing hive workers");
        self.stop().await
    }

    pub async fn stop(&self) -> Result<()> {
        if let Err(e) = self.registry().shutdown().await {
            error!("Registry shutdown failed: {e}");
            return Err(e).context("Failed to shut down the worker registry");
        }
        Ok(())
    }
}
