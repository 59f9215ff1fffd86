//! Built-in hive workers and their class references.

pub mod factory;
pub mod workers;

pub use factory::{register_builtin_workers, builtin_factory};
pub use workers::{
    ChronoDateWorker, LocalFileSystemWorker, LocalPubSubWorker, MemoryCacheWorker,
    StaticConfigWorker, StaticFeatureWorker, TracingLogWorker,
};
