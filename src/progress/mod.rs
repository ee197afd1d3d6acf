//! Progress reporting for build operations

mod handler;
mod logging;

pub use handler::{BuildPhase, NoOpHandler, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
