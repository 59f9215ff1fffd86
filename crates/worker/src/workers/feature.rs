use async_trait::async_trait;
use omnihive_foundation::{
    check_metadata, FeatureWorker, HiveResult, HiveWorker, MetadataShape, Shape, WorkerBase,
};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeatureMetadata {
    pub features: Map<String, Value>,
}

impl MetadataShape for FeatureMetadata {
    fn shape() -> Shape {
        Shape::new().object("features")
    }
}

/// Feature flags read from the worker's metadata.
pub struct StaticFeatureWorker {
    base: WorkerBase,
    features: Map<String, Value>,
}

impl StaticFeatureWorker {
    pub fn new() -> Self {
        Self {
            base: WorkerBase::new(),
            features: Map::new(),
        }
    }
}

impl Default for StaticFeatureWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HiveWorker for StaticFeatureWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        let checked: FeatureMetadata = check_metadata(metadata, name)?;
        self.features = checked.features;
        self.base.set(name, metadata);
        Ok(())
    }
}

#[async_trait]
impl FeatureWorker for StaticFeatureWorker {
    async fn get(&self, name: &str, default: Value) -> HiveResult<Value> {
        Ok(self.features.get(name).cloned().unwrap_or(default))
    }
}
