use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::traits::HiveWorker;
use crate::HiveResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiveLogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for HiveLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HiveLogLevel::Debug => write!(f, "debug"),
            HiveLogLevel::Info => write!(f, "info"),
            HiveLogLevel::Warn => write!(f, "warn"),
            HiveLogLevel::Error => write!(f, "error"),
        }
    }
}

#[async_trait]
pub trait LogWorker: HiveWorker {
    async fn write(&self, level: HiveLogLevel, message: &str) -> HiveResult<()>;
}

#[async_trait]
pub trait ErrorWorker: HiveWorker {
    async fn handle_exception(&self, message: &str) -> HiveResult<()>;
}

pub type PubSubCallback = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Clone)]
pub struct PubSubListener {
    pub channel_name: String,
    pub event_name: String,
    pub callback: PubSubCallback,
}

impl fmt::Debug for PubSubListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSubListener")
            .field("channel_name", &self.channel_name)
            .field("event_name", &self.event_name)
            .finish()
    }
}

#[async_trait]
pub trait PubSubServerWorker: HiveWorker {
    async fn add_listener(
        &self,
        channel_name: &str,
        event_name: &str,
        callback: PubSubCallback,
    ) -> HiveResult<()>;

    async fn remove_listener(&self, channel_name: &str, event_name: &str) -> HiveResult<()>;

    async fn get_listeners(&self) -> Vec<PubSubListener>;

    async fn emit(&self, channel_name: &str, event_name: &str, message: &Value)
        -> HiveResult<()>;
}

#[async_trait]
pub trait PubSubClientWorker: HiveWorker {
    async fn connect(&self) -> HiveResult<()>;

    async fn disconnect(&self) -> HiveResult<()>;

    async fn join_channel(&self, channel_name: &str) -> HiveResult<()>;

    async fn leave_channel(&self, channel_name: &str) -> HiveResult<()>;

    async fn get_joined_channels(&self) -> Vec<String>;

    async fn add_listener(
        &self,
        channel_name: &str,
        event_name: &str,
        callback: PubSubCallback,
    ) -> HiveResult<()>;

    async fn remove_listener(&self, channel_name: &str, event_name: &str) -> HiveResult<()>;

    async fn get_listeners(&self) -> Vec<PubSubListener>;

    async fn emit(&self, event_name: &str, message: &Value) -> HiveResult<()>;
}
