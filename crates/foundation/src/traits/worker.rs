use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::capabilities::{CapabilityType, WorkerHandle};
use crate::models::RegisteredWorker;
use crate::HiveResult;

/// Contract shared by every worker regardless of capability.
///
/// The lifecycle calls `init` exactly once on a freshly constructed worker,
/// registers it, and calls `after_init` once every worker of the batch has
/// been initialized. Sibling lookups belong in `after_init`; during `init`
/// the rest of the batch may not exist yet.
#[async_trait]
pub trait HiveWorker: Send + Sync {
    fn name(&self) -> &str;

    fn metadata(&self) -> &Value;

    /// Validates `metadata` and prepares the worker. Must not look up siblings.
    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()>;

    async fn after_init(&self, _lookup: &dyn WorkerLookup) -> HiveResult<()> {
        Ok(())
    }

    /// Releases backend resources. Only called on registry shutdown or batch rollback.
    async fn dispose(&self) -> HiveResult<()> {
        Ok(())
    }
}

/// Name and raw metadata storage most workers embed.
#[derive(Debug, Clone)]
pub struct WorkerBase {
    name: String,
    metadata: Value,
}

impl WorkerBase {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            metadata: Value::Object(Map::new()),
        }
    }

    pub fn set(&mut self, name: &str, metadata: &Value) {
        self.name = name.to_string();
        self.metadata = metadata.clone();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }
}

impl Default for WorkerBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Implemented by every capability trait object (`dyn CacheWorker`, ...).
pub trait Capability {
    const TYPE: CapabilityType;

    fn from_handle(handle: &WorkerHandle) -> Option<Arc<Self>>;
}

/// Read side of the registry, handed to workers in `after_init`.
#[async_trait]
pub trait WorkerLookup: Send + Sync {
    /// All workers of `capability` in registration order.
    async fn get_by_type(&self, capability: CapabilityType) -> Vec<RegisteredWorker>;

    /// Exact match on type and name. `None` means "not configured", not a fault.
    async fn get_by_type_and_name(
        &self,
        capability: CapabilityType,
        name: &str,
    ) -> Option<RegisteredWorker>;

    async fn get_first_of_type(&self, capability: CapabilityType) -> Option<RegisteredWorker> {
        self.get_by_type(capability).await.into_iter().next()
    }

    /// Named lookup, or the first worker of the type when `name` is `None`.
    async fn get_worker(
        &self,
        capability: CapabilityType,
        name: Option<&str>,
    ) -> Option<RegisteredWorker> {
        match name {
            Some(name) => self.get_by_type_and_name(capability, name).await,
            None => self.get_first_of_type(capability).await,
        }
    }
}

/// Typed lookups on top of [`WorkerLookup`].
#[async_trait]
pub trait WorkerLookupExt: WorkerLookup {
    async fn capability<C>(&self, name: Option<&str>) -> Option<Arc<C>>
    where
        C: Capability + ?Sized + Send + Sync + 'static;

    async fn capabilities<C>(&self) -> Vec<Arc<C>>
    where
        C: Capability + ?Sized + Send + Sync + 'static;
}

#[async_trait]
impl<T: WorkerLookup + ?Sized> WorkerLookupExt for T {
    async fn capability<C>(&self, name: Option<&str>) -> Option<Arc<C>>
    where
        C: Capability + ?Sized + Send + Sync + 'static,
    {
        let worker = self.get_worker(C::TYPE, name).await?;
        C::from_handle(&worker.handle)
    }

    async fn capabilities<C>(&self) -> Vec<Arc<C>>
    where
        C: Capability + ?Sized + Send + Sync + 'static,
    {
        self.get_by_type(C::TYPE)
            .await
            .iter()
            .filter_map(|worker| C::from_handle(&worker.handle))
            .collect()
    }
}
