//! Two-phase worker startup
//!
//! [`LifecycleOrchestrator::init_workers`] drives a batch of descriptors
//! through construct -> init -> register, and only once every worker of the
//! batch is registered, through `after_init`.
//!
//! - `init` failures (including shape and metadata failures and init
//!   timeouts) abort the batch. Registrations made by the batch are undone,
//!   entries they superseded are put back, and the workers constructed so
//!   far are disposed. Writes made by others in the meantime are left alone.
//! - `after_init` failures are collected in the [`InitReport`]; the worker
//!   stays registered and the remaining workers still run their `after_init`.
//!
//! Batches are serialized: one `init` or `after_init` is in flight at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use omnihive_config::RegistryConfig;
use omnihive_foundation::{
    CapabilityType, HiveError, HiveResult, RegisteredWorker, WorkerDescriptor, WorkerHandle,
    WorkerLookup, WorkerRegistry, WorkerState,
};

use crate::worker_factory::WorkerFactory;
use crate::worker_registry::DefaultWorkerRegistry;

#[derive(Debug, Clone, Default)]
pub struct LifecycleOptions {
    /// Upper bound for a single `init` or `after_init` call.
    pub init_timeout: Option<Duration>,
}

impl From<&RegistryConfig> for LifecycleOptions {
    fn from(config: &RegistryConfig) -> Self {
        Self {
            init_timeout: config.init_timeout_seconds.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub name: String,
    pub capability: CapabilityType,
    pub state: WorkerState,
}

#[derive(Debug)]
pub struct AfterInitFailure {
    pub worker: String,
    pub error: HiveError,
}

/// Result of a successful batch.
#[derive(Debug, Default)]
pub struct InitReport {
    /// Registered workers in initialization order.
    pub registered: Vec<String>,
    /// Disabled descriptors that were never constructed.
    pub skipped: Vec<String>,
    pub after_init_failures: Vec<AfterInitFailure>,
    pub outcomes: Vec<WorkerOutcome>,
}

impl InitReport {
    /// True when at least one worker is registered but failed `after_init`.
    pub fn is_degraded(&self) -> bool {
        !self.after_init_failures.is_empty()
    }

    pub fn outcome(&self, name: &str) -> Option<&WorkerOutcome> {
        self.outcomes.iter().rev().find(|outcome| outcome.name == name)
    }

    fn set_state(&mut self, name: &str, state: WorkerState) {
        if let Some(outcome) = self.outcomes.iter_mut().rev().find(|o| o.name == name) {
            outcome.state = state;
        }
    }
}

pub struct LifecycleOrchestrator<R = DefaultWorkerRegistry> {
    registry: Arc<R>,
    factory: Arc<WorkerFactory>,
    options: LifecycleOptions,
    write_gate: Mutex<()>,
}

impl<R> LifecycleOrchestrator<R>
where
    R: WorkerRegistry + 'static,
{
    pub fn new(registry: Arc<R>, factory: Arc<WorkerFactory>) -> Self {
        Self::with_options(registry, factory, LifecycleOptions::default())
    }

    pub fn with_options(
        registry: Arc<R>,
        factory: Arc<WorkerFactory>,
        options: LifecycleOptions,
    ) -> Self {
        Self {
            registry,
            factory,
            options,
            write_gate: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> Arc<R> {
        Arc::clone(&self.registry)
    }

    pub fn factory(&self) -> &WorkerFactory {
        &self.factory
    }

    /// Initializes a batch of descriptors. See the module docs for ordering
    /// and failure semantics.
    pub async fn init_workers(&self, descriptors: &[WorkerDescriptor]) -> HiveResult<InitReport> {
        let _gate = self.write_gate.lock().await;

        let mut report = InitReport::default();
        let mut batch: Vec<&WorkerDescriptor> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if descriptor.enabled {
                batch.push(descriptor);
            } else {
                debug!(worker = %descriptor.name, "Skipping disabled hive worker");
                report.skipped.push(descriptor.name.clone());
            }
        }
        // Stable: configuration order is kept within a section.
        batch.sort_by_key(|descriptor| descriptor.section);

        info!("Initializing {} hive workers", batch.len());
        self.run_batch(&batch, report).await
    }

    /// Adds one worker to a running registry with the same policies as a batch.
    pub async fn push_worker(&self, descriptor: &WorkerDescriptor) -> HiveResult<InitReport> {
        let _gate = self.write_gate.lock().await;

        let mut report = InitReport::default();
        if !descriptor.enabled {
            debug!(worker = %descriptor.name, "Skipping disabled hive worker");
            report.skipped.push(descriptor.name.clone());
            return Ok(report);
        }

        info!(worker = %descriptor.name, "Pushing hive worker");
        self.run_batch(&[descriptor], report).await
    }

    async fn run_batch(
        &self,
        batch: &[&WorkerDescriptor],
        mut report: InitReport,
    ) -> HiveResult<InitReport> {
        // Configuration errors surface before any worker is touched.
        for descriptor in batch {
            self.factory.resolve(descriptor)?;
        }

        let mut initialized: Vec<(&WorkerDescriptor, WorkerHandle)> = Vec::new();
        let mut applied: Vec<AppliedRegistration> = Vec::new();

        for &descriptor in batch {
            report.outcomes.push(WorkerOutcome {
                name: descriptor.name.clone(),
                capability: descriptor.capability,
                state: WorkerState::Unconstructed,
            });

            let outcome = match self.init_one(descriptor, &mut report).await {
                Ok(handle) => {
                    let worker = RegisteredWorker::new(descriptor.clone(), handle.clone());
                    let registered = self.registry.register(worker.clone()).await;
                    // Tracked even when registration failed so rollback disposes it.
                    initialized.push((descriptor, handle));
                    registered.map(|superseded| {
                        applied.push(AppliedRegistration {
                            inserted: worker,
                            superseded,
                        })
                    })
                }
                Err(e) => Err(e),
            };

            if let Err(e) = outcome {
                report.set_state(&descriptor.name, WorkerState::Failed);
                error!(worker = %descriptor.name, "Hive worker failed, aborting batch: {}", e);
                self.roll_back(&applied, &initialized).await;
                return Err(e);
            }
            report.set_state(&descriptor.name, WorkerState::Registered);
            report.registered.push(descriptor.name.clone());
        }

        for (descriptor, handle) in &initialized {
            match self.after_init_one(descriptor, handle).await {
                Ok(()) => report.set_state(&descriptor.name, WorkerState::AfterInitDone),
                Err(e) => {
                    error!(
                        worker = %descriptor.name,
                        "Hive worker failed after init and is degraded: {}", e
                    );
                    report.set_state(&descriptor.name, WorkerState::Failed);
                    report.after_init_failures.push(AfterInitFailure {
                        worker: descriptor.name.clone(),
                        error: e,
                    });
                }
            }
        }

        if report.is_degraded() {
            warn!(
                "{} hive workers registered, {} degraded",
                report.registered.len(),
                report.after_init_failures.len()
            );
        } else {
            info!("{} hive workers registered", report.registered.len());
        }
        Ok(report)
    }

    async fn init_one(
        &self,
        descriptor: &WorkerDescriptor,
        report: &mut InitReport,
    ) -> HiveResult<WorkerHandle> {
        let mut pending = self.factory.construct(descriptor)?;
        report.set_state(&descriptor.name, WorkerState::Constructed);

        let result = match self.options.init_timeout {
            Some(limit) => {
                match timeout(limit, pending.init(&descriptor.name, &descriptor.metadata)).await {
                    Ok(result) => result,
                    Err(_) => Err(HiveError::worker_init(
                        &descriptor.name,
                        format!("init timed out after {}ms", limit.as_millis()),
                    )),
                }
            }
            None => pending.init(&descriptor.name, &descriptor.metadata).await,
        };
        result.map_err(|e| wrap_init_error(&descriptor.name, e))?;

        report.set_state(&descriptor.name, WorkerState::Initialized);
        debug!(worker = %descriptor.name, "Hive worker initialized");
        Ok(pending.into_handle())
    }

    async fn after_init_one(
        &self,
        descriptor: &WorkerDescriptor,
        handle: &WorkerHandle,
    ) -> HiveResult<()> {
        let lookup = self.registry.as_ref();
        let result = match self.options.init_timeout {
            Some(limit) => match timeout(limit, handle.after_init(lookup)).await {
                Ok(result) => result,
                Err(_) => Err(HiveError::Timeout(format!(
                    "after_init timed out after {}ms",
                    limit.as_millis()
                ))),
            },
            None => handle.after_init(lookup).await,
        };

        result.map_err(|e| match e {
            HiveError::WorkerAfterInit { .. } => e,
            other => HiveError::worker_after_init(&descriptor.name, other.to_string()),
        })
    }

    async fn roll_back(
        &self,
        applied: &[AppliedRegistration],
        initialized: &[(&WorkerDescriptor, WorkerHandle)],
    ) {
        for registration in applied.iter().rev() {
            let inserted = &registration.inserted;
            let still_ours = self
                .registry
                .get_by_type_and_name(inserted.capability(), inserted.name())
                .await
                .is_some_and(|current| current.instance_id == inserted.instance_id);
            // Already removed or replaced by someone else.
            if !still_ours {
                continue;
            }

            self.registry.unregister(inserted.name()).await;
            if let Some(previous) = &registration.superseded {
                if let Err(e) = self.registry.register(previous.clone()).await {
                    warn!(worker = %previous.name(), "Restoring superseded worker failed: {}", e);
                }
            }
        }

        for (descriptor, handle) in initialized.iter().rev() {
            if let Err(e) = handle.dispose().await {
                warn!(worker = %descriptor.name, "Dispose during rollback failed: {}", e);
            }
        }
        info!(
            "Rolled back {} hive workers of the failed batch",
            initialized.len()
        );
    }
}

/// One registration made by a batch, kept so a failed batch can undo it.
struct AppliedRegistration {
    inserted: RegisteredWorker,
    superseded: Option<RegisteredWorker>,
}

/// Shape and metadata errors keep their own kind; anything else becomes a
/// `WorkerInit` error carrying the worker name.
fn wrap_init_error(worker: &str, error: HiveError) -> HiveError {
    match error {
        HiveError::Validation { .. }
        | HiveError::Metadata(_)
        | HiveError::Configuration(_)
        | HiveError::WorkerInit { .. } => error.for_worker(worker),
        other => HiveError::worker_init(worker, other.to_string()),
    }
}
