//! Progress reporting for resolution operations

mod handler;
mod logging;

pub use handler::{NoOpHandler, ProgressEvent, ProgressHandler, VersionSource};
pub use logging::LoggingHandler;
