//! Shared building blocks for the deploykit crates: the common error type
//! and tracing subscriber setup.

pub mod error;
pub mod logging;

pub use error::{DeployKitError, DeployKitResult};
pub use logging::{init_logging_with, LogFormat, LogLevel};
