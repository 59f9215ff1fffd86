use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};
use omnihive_foundation::{
    check_metadata, DateWorker, HiveError, HiveResult, HiveWorker, MetadataShape, Shape,
    WorkerBase,
};
use serde::Deserialize;
use serde_json::Value;

use async_trait::async_trait;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateMetadata {
    /// `chrono` strftime pattern, e.g. `%Y-%m-%d %H:%M:%S`.
    pub date_format: String,
}

impl MetadataShape for DateMetadata {
    fn shape() -> Shape {
        Shape::new().string("dateFormat", "%Y-%m-%dT%H:%M:%S%.3fZ")
    }
}

pub struct ChronoDateWorker {
    base: WorkerBase,
    date_format: String,
}

impl ChronoDateWorker {
    pub fn new() -> Self {
        Self {
            base: WorkerBase::new(),
            date_format: String::new(),
        }
    }
}

impl Default for ChronoDateWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HiveWorker for ChronoDateWorker {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn metadata(&self) -> &Value {
        self.base.metadata()
    }

    async fn init(&mut self, name: &str, metadata: &Value) -> HiveResult<()> {
        let checked: DateMetadata = check_metadata(metadata, name)?;
        if StrftimeItems::new(&checked.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(HiveError::metadata_error(format!(
                "Metadata key dateFormat is not a valid date format on hive worker {name}"
            )));
        }
        self.date_format = checked.date_format;
        self.base.set(name, metadata);
        Ok(())
    }
}

impl DateWorker for ChronoDateWorker {
    fn get_format_date_string(&self, date: DateTime<Utc>, format: Option<&str>) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(format.unwrap_or(&self.date_format))).is_err() {
            // Invalid caller-supplied pattern.
            return date.to_rfc3339();
        }
        out
    }

    fn convert_date_to_offset(
        &self,
        date: DateTime<Utc>,
        offset_minutes: i32,
    ) -> HiveResult<DateTime<FixedOffset>> {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                HiveError::validation_error(format!("Invalid UTC offset of {offset_minutes} minutes"))
            })?;
        Ok(date.with_timezone(&offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    async fn worker() -> ChronoDateWorker {
        let mut worker = ChronoDateWorker::new();
        worker
            .init("date", &json!({ "dateFormat": "%Y-%m-%d" }))
            .await
            .unwrap();
        worker
    }

    #[tokio::test]
    async fn test_formats_with_configured_or_explicit_pattern() {
        let worker = worker().await;
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(worker.get_format_date_string(date, None), "2024-03-09");
        assert_eq!(worker.get_format_date_string(date, Some("%H:%M")), "14:05");
    }

    #[tokio::test]
    async fn test_convert_to_offset() {
        let worker = worker().await;
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        let shifted = worker.convert_date_to_offset(date, 90).unwrap();
        assert_eq!(shifted.format("%Y-%m-%d %H:%M").to_string(), "2024-03-10 01:00");
        assert!(worker.convert_date_to_offset(date, 24 * 60).is_err());
    }

    #[tokio::test]
    async fn test_blank_format_rejected() {
        let mut worker = ChronoDateWorker::new();
        let err = worker
            .init("date", &json!({ "dateFormat": " " }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Metadata key dateFormat is a blank string on hive worker date"
        );
    }
}
