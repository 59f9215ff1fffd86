//! Mock workers for lifecycle and registry tests
//!
//! Every [`MockWorker`] writes its lifecycle calls into a shared
//! [`CallJournal`] so tests can assert on cross-worker ordering:
//! `init:<name>`, `after_init:<name>`, `dispose:<name>` and, for workers
//! configured to discover a sibling, `after_init:<name> found <sibling>`.

use async_trait::async_trait;
use omnihive_foundation::{
    check_metadata_with, CacheWorker, CapabilityType, FeatureWorker, HiveError, HiveLogLevel,
    HiveResult, HiveWorker, LogWorker, PendingWorker, Shape, WorkerBase, WorkerLookup,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared, ordered record of calls made by mock workers.
#[derive(Debug, Clone, Default)]
pub struct CallJournal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.lock().unwrap().iter().any(|e| e == entry)
    }

    /// Entries starting with `prefix`, in order.
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// How a [`MockWorker`] behaves in each lifecycle phase.
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    pub fail_init: Option<String>,
    pub fail_after_init: Option<String>,
    pub init_delay: Option<Duration>,
    pub after_init_delay: Option<Duration>,
    pub fail_dispose: bool,
    /// Validated in `init` through the metadata contract when set.
    pub metadata_shape: Option<Shape>,
    /// Looked up in `after_init`; the hit is journaled.
    pub discover: Option<CapabilityType>,
}

impl MockBehavior {
    pub fn fail_init(mut self, message: &str) -> Self {
        self.fail_init = Some(message.to_string());
        self
    }

    pub fn fail_after_init(mut self, message: &str) -> Self {
        self.fail_after_init = Some(message.to_string());
        self
    }

    pub fn init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = Some(delay);
        self
    }

    pub fn after_init_delay(mut self, delay: Duration) -> Self {
        self.after_init_delay = Some(delay);
        self
    }

    pub fn fail_dispose(mut self) -> Self {
        self.fail_dispose = true;
        self
    }

    pub fn metadata_shape(mut self, shape: Shape) -> Self {
        self.metadata_shape = Some(shape);
        self
    }

    pub fn discover(mut self, capability: CapabilityType) -> Self {
        self.discover = Some(capability);
        self
    }
}

/// Test double implementing the cache, log and feature capabilities.
pub struct MockWorker {
    base: WorkerBase,
    journal: CallJournal,
    behavior: MockBehavior,
    store: Mutex<HashMap<String, String>>,
}

impl MockWorker {
    pub fn new(journal: CallJournal) -> Self {
        Self {
            base: WorkerBase::new(),
            journal,
            behavior: MockBehavior::default(),
            store: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Wraps the mock as a constructed worker of `capability`.
    ///
    /// # Panics
    ///
    /// When `capability` is not one of cache, log or feature.
    pub fn into_pending(self, capability: CapabilityType) -> PendingWorker {
        match capability {
            CapabilityType::Cache => PendingWorker::Cache(Box::new(self)),
            CapabilityType::Log => PendingWorker::Log(Box::new(self)),
            CapabilityType::Feature => PendingWorker::Feature(Box::new(self)),
            other => panic!("MockWorker does not implement the {other} capability"),
        }
    }
}

#[async_trait]
impl HiveWorker for MockWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        self.journal.record(format!("init:{name}"));

        if let Some(delay) = self.behavior.init_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(shape) = &self.behavior.metadata_shape {
            check_metadata_with(shape, metadata, name)?;
        }
        if let Some(message) = &self.behavior.fail_init {
            return Err(HiveError::Internal(message.clone()));
        }

        self.base.set(name, metadata);
        Ok(())
    }

    async fn after_init(&self, lookup: &dyn WorkerLookup) -> HiveResult<()> {
        self.journal.record(format!("after_init:{}", self.name()));

        if let Some(delay) = self.behavior.after_init_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(capability) = self.behavior.discover {
            if let Some(found) = lookup.get_first_of_type(capability).await {
                self.journal
                    .record(format!("after_init:{} found {}", self.name(), found.name()));
            }
        }
        if let Some(message) = &self.behavior.fail_after_init {
            return Err(HiveError::Internal(message.clone()));
        }
        Ok(())
    }

    async fn dispose(&self) -> HiveResult<()> {
        self.journal.record(format!("dispose:{}", self.name()));
        if self.behavior.fail_dispose {
            return Err(HiveError::Internal("dispose failed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheWorker for MockWorker {
    async fn exists(&self, key: &str) -> HiveResult<bool> {
        Ok(self.store.lock().unwrap().contains_key(key))
    }

    async fn get(&self, key: &str) -> HiveResult<Option<String>> {
        Ok(self.store.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _expire_seconds: Option<i64>) -> HiveResult<bool> {
        self.store
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn remove(&self, key: &str) -> HiveResult<bool> {
        Ok(self.store.lock().unwrap().remove(key).is_some())
    }
}

#[async_trait]
impl LogWorker for MockWorker {
    async fn write(&self, level: HiveLogLevel, message: &str) -> HiveResult<()> {
        self.journal.record(format!("log:{level}:{message}"));
        Ok(())
    }
}

#[async_trait]
impl FeatureWorker for MockWorker {
    async fn get(&self, name: &str, default: Value) -> HiveResult<Value> {
        Ok(self.metadata().get(name).cloned().unwrap_or(default))
    }
}
