use async_trait::async_trait;
use serde_json::Value;

use crate::traits::HiveWorker;
use crate::HiveResult;

#[async_trait]
pub trait DatabaseWorker: HiveWorker {
    /// Runs a query and returns one row set per statement.
    async fn execute_query(&self, query: &str) -> HiveResult<Vec<Vec<Value>>>;

    async fn execute_stored_procedure(
        &self,
        procedure: &str,
        args: &[Value],
    ) -> HiveResult<Vec<Vec<Value>>>;

    /// Schema description consumed by endpoint generators.
    async fn get_schema(&self) -> HiveResult<Value>;
}

#[async_trait]
pub trait CacheWorker: HiveWorker {
    async fn exists(&self, key: &str) -> HiveResult<bool>;

    async fn get(&self, key: &str) -> HiveResult<Option<String>>;

    /// Stores `value`; `expire_seconds` overrides the worker's default ttl.
    async fn set(&self, key: &str, value: &str, expire_seconds: Option<i64>) -> HiveResult<bool>;

    async fn remove(&self, key: &str) -> HiveResult<bool>;
}

#[async_trait]
pub trait FileSystemWorker: HiveWorker {
    async fn exists(&self, path: &str) -> HiveResult<bool>;

    async fn read_file(&self, path: &str) -> HiveResult<String>;

    async fn write_file(&self, path: &str, contents: &str) -> HiveResult<()>;

    async fn remove_file(&self, path: &str) -> HiveResult<()>;

    async fn ensure_folder(&self, path: &str) -> HiveResult<()>;

    async fn read_dir(&self, path: &str) -> HiveResult<Vec<String>>;
}
