use std::sync::{Arc, Mutex};

use omnihive_core::{DefaultWorkerRegistry, LifecycleOrchestrator};
use omnihive_foundation::{
    CacheWorker, CapabilityType, HiveError, HiveLogLevel, LogWorker, PubSubServerWorker,
    WorkerDescriptor, WorkerLookupExt, WorkerRegistry,
};
use omnihive_worker::builtin_factory;
use serde_json::{json, Value};

fn orchestrator() -> LifecycleOrchestrator {
    LifecycleOrchestrator::new(
        Arc::new(DefaultWorkerRegistry::new()),
        Arc::new(builtin_factory()),
    )
}

fn descriptors(log_to_pubsub: bool) -> Vec<WorkerDescriptor> {
    vec![
        WorkerDescriptor::new("logger", CapabilityType::Log, "tracing-log")
            .with_metadata(json!({ "logChannel": "hive-logs" })),
        WorkerDescriptor::new("hub", CapabilityType::PubSubServer, "local-pubsub"),
        WorkerDescriptor::new("flags", CapabilityType::Feature, "static-feature")
            .with_metadata(json!({ "features": { "logToPubSub": log_to_pubsub } })),
    ]
}

async fn capture_logs(orchestrator: &LifecycleOrchestrator) -> Arc<Mutex<Vec<Value>>> {
    let registry = orchestrator.registry();
    let hub = registry
        .capability::<dyn PubSubServerWorker>(Some("hub"))
        .await
        .unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    hub.add_listener(
        "hive-logs",
        "log",
        Arc::new(move |message: &Value| sink.lock().unwrap().push(message.clone())),
    )
    .await
    .unwrap();
    received
}

#[tokio::test]
async fn test_log_worker_forwards_when_feature_enabled() {
    let orchestrator = orchestrator();
    let report = orchestrator.init_workers(&descriptors(true)).await.unwrap();
    assert!(!report.is_degraded());

    let received = capture_logs(&orchestrator).await;
    let logger = orchestrator
        .registry()
        .capability::<dyn LogWorker>(None)
        .await
        .unwrap();
    logger.write(HiveLogLevel::Warn, "disk almost full").await.unwrap();

    assert_eq!(
        *received.lock().unwrap(),
        vec![json!({ "level": "warn", "message": "disk almost full" })]
    );
}

#[tokio::test]
async fn test_log_worker_stays_local_when_feature_disabled() {
    let orchestrator = orchestrator();
    orchestrator.init_workers(&descriptors(false)).await.unwrap();

    let received = capture_logs(&orchestrator).await;
    let logger = orchestrator
        .registry()
        .capability::<dyn LogWorker>(Some("logger"))
        .await
        .unwrap();
    logger.write(HiveLogLevel::Info, "hello").await.unwrap();

    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cache_worker_through_registry() {
    let orchestrator = orchestrator();
    orchestrator
        .init_workers(&[WorkerDescriptor::new("cache1", CapabilityType::Cache, "memory-cache")
            .with_metadata(json!({ "ttlSeconds": -1 }))])
        .await
        .unwrap();

    let cache = orchestrator
        .registry()
        .capability::<dyn CacheWorker>(Some("cache1"))
        .await
        .unwrap();
    cache.set("k", "v", None).await.unwrap();
    assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
}

#[tokio::test]
async fn test_invalid_builtin_metadata_aborts_batch() {
    let orchestrator = orchestrator();
    let err = orchestrator
        .init_workers(&[
            WorkerDescriptor::new("hub", CapabilityType::PubSubServer, "local-pubsub"),
            WorkerDescriptor::new("logger", CapabilityType::Log, "tracing-log")
                .with_metadata(json!({ "logChannel": "" })),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, HiveError::Metadata(_)));
    assert_eq!(
        err.to_string(),
        "Metadata key logChannel is a blank string on hive worker logger"
    );
    assert!(!orchestrator.registry().contains("hub").await);
}
