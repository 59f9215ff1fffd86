use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::worker::WorkerLookup;
use crate::models::RegisteredWorker;
use crate::HiveResult;

/// What `register` does when the name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last write wins; the previous entry is returned to the caller.
    #[default]
    Replace,
    /// The second registration fails with a configuration error.
    Reject,
}

/// Write side of the worker registry.
#[async_trait]
pub trait WorkerRegistry: WorkerLookup {
    /// Inserts `worker`, returning the entry it superseded, if any.
    async fn register(&self, worker: RegisteredWorker) -> HiveResult<Option<RegisteredWorker>>;

    async fn unregister(&self, name: &str) -> Option<RegisteredWorker>;

    async fn contains(&self, name: &str) -> bool;

    async fn count(&self) -> usize;

    async fn list_names(&self) -> Vec<String>;

    /// Every registered worker in registration order.
    async fn snapshot(&self) -> Vec<RegisteredWorker>;

    /// Replaces the whole contents. Used to roll back a failed batch.
    async fn restore(&self, workers: Vec<RegisteredWorker>);

    /// Forgets every entry without calling any teardown hook.
    async fn clear(&self);

    /// Drains the registry and disposes every worker, newest first.
    async fn shutdown(&self) -> HiveResult<()>;
}
