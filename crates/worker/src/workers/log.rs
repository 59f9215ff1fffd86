use std::sync::Arc;

use async_trait::async_trait;
use omnihive_foundation::{
    check_metadata, FeatureWorker, HiveLogLevel, HiveResult, HiveWorker, LogWorker, MetadataShape,
    PubSubServerWorker, Shape, WorkerBase, WorkerLookup, WorkerLookupExt,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Feature flag that turns on forwarding of log lines to pub/sub.
pub const LOG_TO_PUBSUB_FEATURE: &str = "logToPubSub";
/// Event name used for forwarded log lines.
pub const LOG_EVENT: &str = "log";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    pub log_channel: String,
}

impl MetadataShape for LogMetadata {
    fn shape() -> Shape {
        Shape::new().string("logChannel", "")
    }
}

/// Log worker backed by `tracing`.
///
/// Once the batch is registered it looks for the first pub/sub server and the
/// first feature worker. When the `logToPubSub` flag is on, every line is also
/// emitted as `{level, message}` on the configured channel.
pub struct TracingLogWorker {
    base: WorkerBase,
    log_channel: String,
    forward_to: RwLock<Option<Arc<dyn PubSubServerWorker>>>,
}

impl TracingLogWorker {
    pub fn new() -> Self {
        Self {
            base: WorkerBase::new(),
            log_channel: String::new(),
            forward_to: RwLock::new(None),
        }
    }
}

impl Default for TracingLogWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HiveWorker for TracingLogWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        let checked: LogMetadata = check_metadata(metadata, name)?;
        self.log_channel = checked.log_channel;
        self.base.set(name, metadata);
        Ok(())
    }

    async fn after_init(&self, lookup: &dyn WorkerLookup) -> HiveResult<()> {
        let pubsub = lookup.capability::<dyn PubSubServerWorker>(None).await;
        let feature = lookup.capability::<dyn FeatureWorker>(None).await;

        let enabled = match &feature {
            Some(feature) => feature
                .get(LOG_TO_PUBSUB_FEATURE, Value::Bool(false))
                .await?
                .as_bool()
                .unwrap_or(false),
            None => false,
        };

        match (pubsub, enabled) {
            (Some(pubsub), true) => {
                debug!(
                    worker = %self.name(),
                    channel = %self.log_channel,
                    "Forwarding log lines to pub/sub"
                );
                *self.forward_to.write().await = Some(pubsub);
            }
            (None, true) => {
                warn!(
                    worker = %self.name(),
                    "{} is enabled but no pub/sub server is registered", LOG_TO_PUBSUB_FEATURE
                );
            }
            _ => {}
        }
        Ok(())
    }
}

#[async_trait]
impl LogWorker for TracingLogWorker {
    async fn write(&self, level: HiveLogLevel, message: &str) -> HiveResult<()> {
        match level {
            HiveLogLevel::Debug => debug!(worker = %self.name(), "{}", message),
            HiveLogLevel::Info => info!(worker = %self.name(), "{}", message),
            HiveLogLevel::Warn => warn!(worker = %self.name(), "{}", message),
            HiveLogLevel::Error => error!(worker = %self.name(), "{}", message),
        }

        let target = self.forward_to.read().await.clone();
        if let Some(pubsub) = target {
            pubsub
                .emit(
                    &self.log_channel,
                    LOG_EVENT,
                    &json!({ "level": level, "message": message }),
                )
                .await?;
        }
        Ok(())
    }
}
