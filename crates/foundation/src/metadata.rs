//! Worker metadata contract
//!
//! Every worker validates its metadata blob in `init` before using it. The
//! check runs in two layers:
//!
//! 1. strict projection onto the worker's declared [`Shape`] (wrong shape);
//! 2. semantic emptiness: null values, blank strings and empty arrays are
//!    rejected even though they have the right shape.
//!
//! Numeric ranges are deliberately not checked here; a worker that needs a
//! positive timeout validates that itself.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::projector::{project, FieldKind, Shape};
use crate::{HiveError, HiveResult};

/// Typed metadata of a worker together with its declared shape.
pub trait MetadataShape: DeserializeOwned {
    fn shape() -> Shape;
}

/// Metadata for workers that take no configuration. Only `{}` is accepted.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NoMetadata {}

impl MetadataShape for NoMetadata {
    fn shape() -> Shape {
        Shape::new()
    }
}

/// Validates `raw` against `T`'s shape and returns the typed metadata.
pub fn check_metadata<T: MetadataShape>(raw: &Value, worker_name: &str) -> HiveResult<T> {
    let checked = check_metadata_with(&T::shape(), raw, worker_name)?;
    serde_json::from_value(Value::Object(checked)).map_err(|e| HiveError::Validation {
        worker: Some(worker_name.to_string()),
        message: e.to_string(),
    })
}

/// Untyped variant of [`check_metadata`].
pub fn check_metadata_with(
    shape: &Shape,
    raw: &Value,
    worker_name: &str,
) -> HiveResult<Map<String, Value>> {
    let projected = project(shape, Some(raw), true).map_err(|e| e.for_worker(worker_name))?;

    for field in shape.fields() {
        let value = projected.get(&field.name).unwrap_or(&Value::Null);
        if value.is_null() {
            return Err(HiveError::metadata_error(format!(
                "Metadata key {} is null or undefined on hive worker {worker_name}",
                field.name
            )));
        }
        match (field.kind, value) {
            (FieldKind::String, Value::String(s)) if s.trim().is_empty() => {
                return Err(HiveError::metadata_error(format!(
                    "Metadata key {} is a blank string on hive worker {worker_name}",
                    field.name
                )));
            }
            (FieldKind::Array, Value::Array(items)) if items.is_empty() => {
                return Err(HiveError::metadata_error(format!(
                    "Metadata key {} is an empty array on hive worker {worker_name}",
                    field.name
                )));
            }
            _ => {}
        }
    }

    Ok(projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct CacheMetadata {
        ttl_seconds: i64,
    }

    impl MetadataShape for CacheMetadata {
        fn shape() -> Shape {
            Shape::new().number("ttlSeconds", 60)
        }
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct PubSubMetadata {
        #[allow(dead_code)]
        channel_name: String,
        #[allow(dead_code)]
        hosts: Vec<String>,
    }

    impl MetadataShape for PubSubMetadata {
        fn shape() -> Shape {
            Shape::new().string("channelName", "").array("hosts")
        }
    }

    #[test]
    fn test_negative_number_passes_contract() {
        let metadata: CacheMetadata =
            check_metadata(&json!({ "ttlSeconds": -1 }), "cache1").unwrap();
        assert_eq!(metadata, CacheMetadata { ttl_seconds: -1 });
    }

    #[test]
    fn test_blank_string_rejected_with_worker_and_field() {
        let err = check_metadata::<PubSubMetadata>(
            &json!({ "channelName": "   ", "hosts": ["a"] }),
            "pubsub1",
        )
        .unwrap_err();
        assert!(matches!(err, HiveError::Metadata(_)));
        assert_eq!(
            err.to_string(),
            "Metadata key channelName is a blank string on hive worker pubsub1"
        );
    }

    #[test]
    fn test_empty_array_rejected_with_worker_and_field() {
        let err = check_metadata::<PubSubMetadata>(
            &json!({ "channelName": "events", "hosts": [] }),
            "pubsub1",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Metadata key hosts is an empty array on hive worker pubsub1"
        );
    }

    #[test]
    fn test_null_value_rejected() {
        let err = check_metadata::<PubSubMetadata>(
            &json!({ "channelName": null, "hosts": ["a"] }),
            "pubsub1",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Metadata key channelName is null or undefined on hive worker pubsub1"
        );
    }

    #[test]
    fn test_shape_failure_is_wrapped_with_worker_name() {
        let err = check_metadata::<CacheMetadata>(
            &json!({ "ttlSeconds": 5, "host": "x" }),
            "cache1",
        )
        .unwrap_err();
        match &err {
            HiveError::Validation { worker, message } => {
                assert_eq!(worker.as_deref(), Some("cache1"));
                assert!(message.contains("Unexpected key 'host'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("hive worker cache1"));
    }

    #[test]
    fn test_missing_metadata_fails_strict_projection() {
        let err = check_metadata::<CacheMetadata>(&Value::Null, "cache1").unwrap_err();
        assert!(matches!(err, HiveError::Validation { .. }));
    }

    #[test]
    fn test_no_metadata_accepts_only_empty_object() {
        assert!(check_metadata::<NoMetadata>(&json!({}), "fs").is_ok());
        assert!(check_metadata::<NoMetadata>(&json!({ "a": 1 }), "fs").is_err());
    }

    #[test]
    fn test_type_error_after_projection_names_worker() {
        let err = check_metadata::<CacheMetadata>(&json!({ "ttlSeconds": "ten" }), "cache1")
            .unwrap_err();
        assert!(err.to_string().contains("hive worker cache1"));
    }
}
