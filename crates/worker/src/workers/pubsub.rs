use async_trait::async_trait;
use omnihive_foundation::{
    check_metadata, HiveResult, HiveWorker, NoMetadata, PubSubCallback, PubSubListener,
    PubSubServerWorker, WorkerBase,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// In-process publish/subscribe hub. Listeners are keyed by channel and event.
pub struct LocalPubSubWorker {
    base: WorkerBase,
    listeners: RwLock<Vec<PubSubListener>>,
}

impl LocalPubSubWorker {
    pub fn new() -> Self {
        Self {
            base: WorkerBase::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl Default for LocalPubSubWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HiveWorker for LocalPubSubWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        check_metadata::<NoMetadata>(metadata, name)?;
        self.base.set(name, metadata);
        Ok(())
    }

    async fn dispose(&self) -> HiveResult<()> {
        self.listeners.write().await.clear();
        Ok(())
    }
}

#[async_trait]
impl PubSubServerWorker for LocalPubSubWorker {
    async fn add_listener(
        &self,
        channel_name: &str,
        event_name: &str,
        callback: PubSubCallback,
    ) -> HiveResult<()> {
        self.listeners.write().await.push(PubSubListener {
            channel_name: channel_name.to_string(),
            event_name: event_name.to_string(),
            callback,
        });
        Ok(())
    }

    async fn remove_listener(&self, channel_name: &str, event_name: &str) -> HiveResult<()> {
        self.listeners.write().await.retain(|listener| {
            !(listener.channel_name == channel_name && listener.event_name == event_name)
        });
        Ok(())
    }

    async fn get_listeners(&self) -> Vec<PubSubListener> {
        self.listeners.read().await.clone()
    }

    async fn emit(
        &self,
        channel_name: &str,
        event_name: &str,
        message: &Value,
    ) -> HiveResult<()> {
        // Callbacks run outside the lock so they may register listeners themselves.
        let targets: Vec<PubSubListener> = self
            .listeners
            .read()
            .await
            .iter()
            .filter(|l| l.channel_name == channel_name && l.event_name == event_name)
            .cloned()
            .collect();

        debug!(
            channel = %channel_name,
            event = %event_name,
            listeners = targets.len(),
            "Emitting pub/sub event"
        );
        for listener in targets {
            (listener.callback)(message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_emit_reaches_matching_listeners_only() {
        let mut hub = LocalPubSubWorker::new();
        hub.init("hub", &json!({})).await.unwrap();

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        hub.add_listener(
            "logs",
            "log",
            Arc::new(move |message: &Value| sink.lock().unwrap().push(message.clone())),
        )
        .await
        .unwrap();

        hub.emit("logs", "log", &json!({ "n": 1 })).await.unwrap();
        hub.emit("logs", "other", &json!({ "n": 2 })).await.unwrap();
        hub.emit("metrics", "log", &json!({ "n": 3 })).await.unwrap();

        assert_eq!(*received.lock().unwrap(), vec![json!({ "n": 1 })]);

        hub.remove_listener("logs", "log").await.unwrap();
        assert!(hub.get_listeners().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_any_metadata_key() {
        let mut hub = LocalPubSubWorker::new();
        assert!(hub.init("hub", &json!({ "port": 1 })).await.is_err());
    }
}
