pub mod lifecycle;
pub mod logging;
pub mod worker_factory;
pub mod worker_registry;

pub use lifecycle::{
    AfterInitFailure, InitReport, LifecycleOptions, LifecycleOrchestrator, WorkerOutcome,
};
pub use logging::init_logging;
pub use worker_factory::{WorkerConstructor, WorkerFactory};
pub use worker_registry::DefaultWorkerRegistry;

pub use omnihive_foundation::{HiveError, HiveResult};
