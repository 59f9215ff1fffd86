use async_trait::async_trait;
use omnihive_foundation::{
    check_metadata, ConfigWorker, HiveResult, HiveWorker, MetadataShape, Shape, WorkerBase,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConfigMetadata {
    pub settings: Map<String, Value>,
}

impl MetadataShape for ConfigMetadata {
    fn shape() -> Shape {
        Shape::new().object("settings")
    }
}

/// Runtime settings seeded from metadata. `set` changes are not persisted.
pub struct StaticConfigWorker {
    base: WorkerBase,
    settings: RwLock<Map<String, Value>>,
}

impl StaticConfigWorker {
    pub fn new() -> Self {
        Self {
            base: WorkerBase::new(),
            settings: RwLock::new(Map::new()),
        }
    }
}

impl Default for StaticConfigWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HiveWorker for StaticConfigWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        let checked: ConfigMetadata = check_metadata(metadata, name)?;
        *self.settings.get_mut() = checked.settings;
        self.base.set(name, metadata);
        Ok(())
    }
}

#[async_trait]
impl ConfigWorker for StaticConfigWorker {
    async fn get(&self, key: &str) -> HiveResult<Option<Value>> {
        Ok(self.settings.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> HiveResult<bool> {
        self.settings.write().await.insert(key.to_string(), value);
        Ok(true)
    }

    async fn get_all(&self) -> HiveResult<Value> {
        Ok(Value::Object(self.settings.read().await.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_set_get_all() {
        let mut worker = StaticConfigWorker::new();
        worker
            .init("settings", &json!({ "settings": { "region": "eu" } }))
            .await
            .unwrap();

        assert_eq!(worker.get("region").await.unwrap(), Some(json!("eu")));
        assert_eq!(worker.get("missing").await.unwrap(), None);

        worker.set("retries", json!(3)).await.unwrap();
        assert_eq!(
            worker.get_all().await.unwrap(),
            json!({ "region": "eu", "retries": 3 })
        );
    }
}
