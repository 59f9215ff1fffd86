pub mod app_config;
pub mod logging;
pub mod registry;
pub mod server;

pub use app_config::*;
pub use logging::*;
pub use registry::*;
pub use server::*;
