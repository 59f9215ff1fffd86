use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use crate::traits::HiveWorker;
use crate::HiveResult;

#[async_trait]
pub trait FeatureWorker: HiveWorker {
    /// Flag value, or `default` when the flag is unknown.
    async fn get(&self, name: &str, default: Value) -> HiveResult<Value>;
}

#[async_trait]
pub trait ConfigWorker: HiveWorker {
    async fn get(&self, key: &str) -> HiveResult<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> HiveResult<bool>;

    async fn get_all(&self) -> HiveResult<Value>;
}

pub trait DateWorker: HiveWorker {
    /// Formats `date` with `format`, or the worker's configured format.
    fn get_format_date_string(&self, date: DateTime<Utc>, format: Option<&str>) -> String;

    fn convert_date_to_offset(
        &self,
        date: DateTime<Utc>,
        offset_minutes: i32,
    ) -> HiveResult<DateTime<FixedOffset>>;
}
