use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use omnihive_foundation::{HiveError, HiveResult, PendingWorker, WorkerDescriptor};

pub type WorkerConstructor = Arc<dyn Fn() -> PendingWorker + Send + Sync>;

/// Maps class references from configuration to worker constructors.
///
/// Populated once at startup; resolution never loads code by name.
#[derive(Clone, Default)]
pub struct WorkerFactory {
    constructors: HashMap<String, WorkerConstructor>,
}

impl WorkerFactory {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers `constructor` under `class_ref`, replacing any previous one.
    pub fn register<F>(&mut self, class_ref: &str, constructor: F) -> &mut Self
    where
        F: Fn() -> PendingWorker + Send + Sync + 'static,
    {
        self.constructors
            .insert(class_ref.to_string(), Arc::new(constructor));
        self
    }

    pub fn contains(&self, class_ref: &str) -> bool {
        self.constructors.contains_key(class_ref)
    }

    pub fn class_refs(&self) -> Vec<String> {
        let mut refs: Vec<String> = self.constructors.keys().cloned().collect();
        refs.sort();
        refs
    }

    /// Checks that `descriptor` is well formed and resolvable without constructing it.
    pub fn resolve(&self, descriptor: &WorkerDescriptor) -> HiveResult<&WorkerConstructor> {
        descriptor.validate()?;
        self.constructors.get(&descriptor.class_ref).ok_or_else(|| {
            HiveError::config_error(format!(
                "Unknown class reference '{}' for hive worker {}",
                descriptor.class_ref, descriptor.name
            ))
        })
    }

    /// Constructs a fresh, uninitialized worker for `descriptor`.
    pub fn construct(&self, descriptor: &WorkerDescriptor) -> HiveResult<PendingWorker> {
        let constructor = self.resolve(descriptor)?;
        let worker = constructor();

        if worker.capability() != descriptor.capability {
            return Err(HiveError::config_error(format!(
                "Class reference '{}' provides a {} worker but hive worker {} is declared as {}",
                descriptor.class_ref,
                worker.capability(),
                descriptor.name,
                descriptor.capability
            )));
        }

        debug!(
            worker = %descriptor.name,
            class_ref = %descriptor.class_ref,
            "Constructed hive worker"
        );
        Ok(worker)
    }
}

impl std::fmt::Debug for WorkerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerFactory")
            .field("class_refs", &self.class_refs())
            .finish()
    }
}
