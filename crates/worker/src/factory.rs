use omnihive_core::WorkerFactory;
use omnihive_foundation::PendingWorker;
use tracing::debug;

use crate::workers::{
    ChronoDateWorker, LocalFileSystemWorker, LocalPubSubWorker, MemoryCacheWorker,
    StaticConfigWorker, StaticFeatureWorker, TracingLogWorker,
};

pub const MEMORY_CACHE: &str = "memory-cache";
pub const TRACING_LOG: &str = "tracing-log";
pub const LOCAL_PUBSUB: &str = "local-pubsub";
pub const STATIC_FEATURE: &str = "static-feature";
pub const CHRONO_DATE: &str = "chrono-date";
pub const LOCAL_FILESYSTEM: &str = "local-filesystem";
pub const STATIC_CONFIG: &str = "static-config";

/// Adds every built-in worker to `factory` under its class reference.
pub fn register_builtin_workers(factory: &mut WorkerFactory) -> &mut WorkerFactory {
    factory
        .register(MEMORY_CACHE, || {
            PendingWorker::Cache(Box::new(MemoryCacheWorker::new()))
        })
        .register(TRACING_LOG, || PendingWorker::Log(Box::new(TracingLogWorker::new())))
        .register(LOCAL_PUBSUB, || {
            PendingWorker::PubSubServer(Box::new(LocalPubSubWorker::new()))
        })
        .register(STATIC_FEATURE, || {
            PendingWorker::Feature(Box::new(StaticFeatureWorker::new()))
        })
        .register(CHRONO_DATE, || PendingWorker::Date(Box::new(ChronoDateWorker::new())))
        .register(LOCAL_FILESYSTEM, || {
            PendingWorker::FileSystem(Box::new(LocalFileSystemWorker::new()))
        })
        .register(STATIC_CONFIG, || {
            PendingWorker::Config(Box::new(StaticConfigWorker::new()))
        });

    debug!("Registered built-in worker class references");
    factory
}

/// A factory holding only the built-in workers.
pub fn builtin_factory() -> WorkerFactory {
    let mut factory = WorkerFactory::new();
    register_builtin_workers(&mut factory);
    factory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_registered() {
        let factory = builtin_factory();
        assert_eq!(
            factory.class_refs(),
            vec![
                CHRONO_DATE,
                LOCAL_FILESYSTEM,
                LOCAL_PUBSUB,
                MEMORY_CACHE,
                STATIC_CONFIG,
                STATIC_FEATURE,
                TRACING_LOG,
            ]
        );
    }
}
