mod cache;
mod config;
mod date;
mod feature;
mod filesystem;
mod log;
mod pubsub;

pub use cache::{CacheMetadata, MemoryCacheWorker};
pub use config::{ConfigMetadata, StaticConfigWorker};
pub use date::{ChronoDateWorker, DateMetadata};
pub use feature::{FeatureMetadata, StaticFeatureWorker};
pub use filesystem::{FileSystemMetadata, LocalFileSystemWorker};
pub use log::{LogMetadata, TracingLogWorker, LOG_EVENT, LOG_TO_PUBSUB_FEATURE};
pub use pubsub::LocalPubSubWorker;
