pub mod app;
pub mod shutdown;
