//! # OmniHive Foundation
//!
//! Core abstractions shared by every crate of the worker host:
//!
//! - **Strict object projection** ([`projector`]): maps untyped JSON onto a
//!   declared [`Shape`] in permissive or strict mode
//! - **Metadata contract** ([`metadata`]): strict projection plus semantic
//!   emptiness checks, run by every worker in `init`
//! - **Capability set** ([`traits::capabilities`]): the capability traits a
//!   worker implements and the typed [`WorkerHandle`] wrapping them
//! - **Registry contracts** ([`WorkerLookup`], [`WorkerRegistry`]): implemented
//!   by `omnihive-core`
//! - **Models**: [`WorkerDescriptor`], [`RegisteredWorker`], [`Section`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use omnihive_foundation::prelude::*;
//!
//! let cache = lookup.capability::<dyn CacheWorker>(Some("cache1")).await;
//! ```

pub mod metadata;
pub mod models;
pub mod projector;
pub mod traits;

pub use metadata::{check_metadata, check_metadata_with, MetadataShape, NoMetadata};
pub use models::{RegisteredWorker, Section, WorkerDescriptor, WorkerState};
pub use omnihive_errors::{HiveError, HiveResult};
pub use projector::{project, project_array, project_as, FieldKind, FieldSpec, Shape};
pub use traits::*;

pub mod prelude {
    pub use crate::metadata::{check_metadata, MetadataShape, NoMetadata};
    pub use crate::models::*;
    pub use crate::projector::{FieldKind, Shape};
    pub use crate::traits::*;
    pub use omnihive_errors::{HiveError, HiveResult};
}
