pub mod capabilities;
pub mod registry;
pub mod worker;

pub use capabilities::*;
pub use registry::{DuplicatePolicy, WorkerRegistry};
pub use worker::{Capability, HiveWorker, WorkerBase, WorkerLookup, WorkerLookupExt};
