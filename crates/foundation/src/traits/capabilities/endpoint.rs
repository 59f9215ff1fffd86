use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::traits::{HiveWorker, WorkerLookup};
use crate::HiveResult;

/// Hosts the HTTP surface. Route construction lives outside this workspace;
/// the worker only receives the registry to discover endpoint workers.
#[async_trait]
pub trait ServerWorker: HiveWorker {
    async fn build_server(&self, lookup: &dyn WorkerLookup) -> HiveResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestEndpointResponse {
    pub response: Value,
    pub status: u16,
}

#[async_trait]
pub trait RestEndpointWorker: HiveWorker {
    async fn execute(
        &self,
        headers: &HashMap<String, String>,
        url: &str,
        body: &Value,
    ) -> HiveResult<RestEndpointResponse>;

    fn get_swagger_definition(&self) -> Option<Value> {
        None
    }
}

#[async_trait]
pub trait GraphEndpointWorker: HiveWorker {
    async fn execute(&self, custom_args: &Value) -> HiveResult<Value>;
}

#[async_trait]
pub trait TaskEndpointWorker: HiveWorker {
    async fn execute(&self, custom_args: &Value) -> HiveResult<Value>;
}
