//! # OmniHive Testing Utils
//!
//! Shared test doubles for the worker host crates.
//!
//! - **Call journal**: ordered record of lifecycle calls across workers
//! - **Mock workers**: configurable `init`/`after_init`/`dispose` behavior,
//!   usable as cache, log or feature workers
//! - **Descriptor builders**: worker descriptors with sensible defaults
//!
//! Add this crate as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! omnihive-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::*;
pub use helpers::*;
pub use mocks::*;
