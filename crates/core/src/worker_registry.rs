use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use omnihive_foundation::{
    CapabilityType, DuplicatePolicy, HiveError, HiveResult, RegisteredWorker, WorkerLookup,
    WorkerRegistry,
};

/// In-memory worker registry.
///
/// Entries are kept in registration order and names are unique across all
/// capability types. Writes take the lock exclusively; lookups share it.
pub struct DefaultWorkerRegistry {
    workers: RwLock<Vec<RegisteredWorker>>,
    policy: DuplicatePolicy,
}

impl DefaultWorkerRegistry {
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            workers: RwLock::new(Vec::new()),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Number of registered workers per capability type.
    pub async fn count_by_type(&self) -> Vec<(CapabilityType, usize)> {
        let workers = self.workers.read().await;
        CapabilityType::ALL
            .iter()
            .map(|capability| {
                let count = workers
                    .iter()
                    .filter(|worker| worker.capability() == *capability)
                    .count();
                (*capability, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for DefaultWorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerLookup for DefaultWorkerRegistry {
    async fn get_by_type(&self, capability: CapabilityType) -> Vec<RegisteredWorker> {
        let workers = self.workers.read().await;
        workers
            .iter()
            .filter(|worker| worker.capability() == capability)
            .cloned()
            .collect()
    }

    async fn get_by_type_and_name(
        &self,
        capability: CapabilityType,
        name: &str,
    ) -> Option<RegisteredWorker> {
        let workers = self.workers.read().await;
        workers
            .iter()
            .find(|worker| worker.capability() == capability && worker.name() == name)
            .cloned()
    }

    async fn get_first_of_type(&self, capability: CapabilityType) -> Option<RegisteredWorker> {
        let workers = self.workers.read().await;
        workers
            .iter()
            .find(|worker| worker.capability() == capability)
            .cloned()
    }
}

#[async_trait]
impl WorkerRegistry for DefaultWorkerRegistry {
    async fn register(&self, worker: RegisteredWorker) -> HiveResult<Option<RegisteredWorker>> {
        let mut workers = self.workers.write().await;
        let existing = workers.iter().position(|w| w.name() == worker.name());

        let previous = match (existing, self.policy) {
            (Some(_), DuplicatePolicy::Reject) => {
                return Err(HiveError::config_error(format!(
                    "Hive worker {} is already registered",
                    worker.name()
                )));
            }
            (Some(index), DuplicatePolicy::Replace) => {
                let previous = workers.remove(index);
                info!(
                    worker = %worker.name(),
                    previous_type = %previous.capability(),
                    "Replacing registered hive worker"
                );
                Some(previous)
            }
            (None, _) => None,
        };

        debug!(
            worker = %worker.name(),
            capability = %worker.capability(),
            section = %worker.section,
            "Registered hive worker"
        );
        workers.push(worker);
        Ok(previous)
    }

    async fn unregister(&self, name: &str) -> Option<RegisteredWorker> {
        let mut workers = self.workers.write().await;
        let index = workers.iter().position(|worker| worker.name() == name)?;
        Some(workers.remove(index))
    }

    async fn contains(&self, name: &str) -> bool {
        let workers = self.workers.read().await;
        workers.iter().any(|worker| worker.name() == name)
    }

    async fn count(&self) -> usize {
        self.workers.read().await.len()
    }

    async fn list_names(&self) -> Vec<String> {
        let workers = self.workers.read().await;
        workers.iter().map(|worker| worker.name().to_string()).collect()
    }

    async fn snapshot(&self) -> Vec<RegisteredWorker> {
        self.workers.read().await.clone()
    }

    async fn restore(&self, snapshot: Vec<RegisteredWorker>) {
        let mut workers = self.workers.write().await;
        *workers = snapshot;
    }

    async fn clear(&self) {
        let mut workers = self.workers.write().await;
        workers.clear();
    }

    async fn shutdown(&self) -> HiveResult<()> {
        let drained: Vec<RegisteredWorker> = {
            let mut workers = self.workers.write().await;
            workers.drain(..).collect()
        };

        info!("Shutting down {} hive workers", drained.len());

        for worker in drained.iter().rev() {
            debug!(worker = %worker.name(), "Disposing hive worker");
            if let Err(e) = worker.handle.dispose().await {
                warn!(worker = %worker.name(), "Dispose failed: {}", e);
            }
        }

        info!("All hive workers have been shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnihive_foundation::{CacheWorker, LogWorker, WorkerLookupExt};
    use omnihive_testing_utils::{
        initialized_worker, initialized_worker_with, CallJournal, MockBehavior,
    };

    #[tokio::test]
    async fn test_register_and_lookup_by_type_and_name() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        registry
            .register(initialized_worker(&journal, "cache1", CapabilityType::Cache).await.unwrap())
            .await
            .unwrap();
        registry
            .register(initialized_worker(&journal, "log1", CapabilityType::Log).await.unwrap())
            .await
            .unwrap();

        let found = registry
            .get_by_type_and_name(CapabilityType::Cache, "cache1")
            .await
            .unwrap();
        assert_eq!(found.name(), "cache1");

        // Name matches but type does not.
        assert!(registry
            .get_by_type_and_name(CapabilityType::Log, "cache1")
            .await
            .is_none());
        assert!(registry
            .get_by_type_and_name(CapabilityType::Cache, "missing")
            .await
            .is_none());
        assert_eq!(registry.get_by_type(CapabilityType::Cache).await.len(), 1);
        assert!(registry.get_by_type(CapabilityType::Database).await.is_empty());
    }

    #[tokio::test]
    async fn test_first_of_type_follows_registration_order() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        for name in ["c1", "c2", "c3"] {
            registry
                .register(initialized_worker(&journal, name, CapabilityType::Cache).await.unwrap())
                .await
                .unwrap();
        }

        let first = registry
            .get_first_of_type(CapabilityType::Cache)
            .await
            .unwrap();
        assert_eq!(first.name(), "c1");
        assert_eq!(registry.list_names().await, vec!["c1", "c2", "c3"]);
    }

    #[tokio::test]
    async fn test_replace_policy_last_write_wins() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        let first = initialized_worker(&journal, "shared", CapabilityType::Cache)
            .await
            .unwrap();
        let first_id = first.instance_id;
        registry.register(first).await.unwrap();

        let previous = registry
            .register(initialized_worker(&journal, "shared", CapabilityType::Log).await.unwrap())
            .await
            .unwrap();

        assert_eq!(previous.unwrap().instance_id, first_id);
        assert_eq!(registry.count().await, 1);
        assert!(registry
            .get_by_type_and_name(CapabilityType::Cache, "shared")
            .await
            .is_none());
        assert!(registry
            .get_by_type_and_name(CapabilityType::Log, "shared")
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_reject_policy_keeps_first_registration() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::with_policy(DuplicatePolicy::Reject);
        registry
            .register(initialized_worker(&journal, "shared", CapabilityType::Cache).await.unwrap())
            .await
            .unwrap();

        let err = registry
            .register(initialized_worker(&journal, "shared", CapabilityType::Cache).await.unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, HiveError::Configuration(_)));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_typed_capability_lookup() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        registry
            .register(initialized_worker(&journal, "cache1", CapabilityType::Cache).await.unwrap())
            .await
            .unwrap();

        let cache = registry
            .capability::<dyn CacheWorker>(Some("cache1"))
            .await
            .unwrap();
        assert!(cache.set("k", "v", None).await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));

        assert!(registry.capability::<dyn LogWorker>(None).await.is_none());
        assert_eq!(registry.capabilities::<dyn CacheWorker>().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unregister_and_clear() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        for name in ["a", "b"] {
            registry
                .register(initialized_worker(&journal, name, CapabilityType::Cache).await.unwrap())
                .await
                .unwrap();
        }

        assert!(registry.unregister("a").await.is_some());
        assert!(registry.unregister("a").await.is_none());
        assert!(!registry.contains("a").await);
        assert!(registry.contains("b").await);

        registry.clear().await;
        assert_eq!(registry.count().await, 0);
        // Clearing only forgets workers; dispose hooks are not run.
        assert!(journal.with_prefix("dispose:").is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_disposes_newest_first_and_continues_on_failure() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        registry
            .register(initialized_worker(&journal, "a", CapabilityType::Cache).await.unwrap())
            .await
            .unwrap();
        registry
            .register(
                initialized_worker_with(
                    &journal,
                    "b",
                    CapabilityType::Cache,
                    MockBehavior::default().fail_dispose(),
                )
                .await
                .unwrap(),
            )
            .await
            .unwrap();
        registry
            .register(initialized_worker(&journal, "c", CapabilityType::Log).await.unwrap())
            .await
            .unwrap();

        registry.shutdown().await.unwrap();

        assert_eq!(
            journal.with_prefix("dispose:"),
            vec!["dispose:c", "dispose:b", "dispose:a"]
        );
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_snapshot_and_restore() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        registry
            .register(initialized_worker(&journal, "a", CapabilityType::Cache).await.unwrap())
            .await
            .unwrap();
        let snapshot = registry.snapshot().await;

        registry
            .register(initialized_worker(&journal, "b", CapabilityType::Cache).await.unwrap())
            .await
            .unwrap();
        registry.restore(snapshot).await;

        assert_eq!(registry.list_names().await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_count_by_type() {
        let journal = CallJournal::new();
        let registry = DefaultWorkerRegistry::new();
        for (name, capability) in [
            ("c1", CapabilityType::Cache),
            ("c2", CapabilityType::Cache),
            ("l1", CapabilityType::Log),
        ] {
            registry
                .register(initialized_worker(&journal, name, capability).await.unwrap())
                .await
                .unwrap();
        }

        let counts = registry.count_by_type().await;
        assert!(counts.contains(&(CapabilityType::Cache, 2)));
        assert!(counts.contains(&(CapabilityType::Log, 1)));
        assert_eq!(counts.len(), 2);
    }
}
