pub mod descriptor;
pub mod registered;

pub use descriptor::{Section, WorkerDescriptor};
pub use registered::{RegisteredWorker, WorkerState};
