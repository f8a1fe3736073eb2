use deploykit_utils::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// Logging configuration for the deploykit tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback level when `RUST_LOG` is not set
    pub level: LogLevel,

    /// Output format of log lines
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber described by this configuration
    pub fn init(&self) -> deploykit_utils::DeployKitResult<()> {
        deploykit_utils::init_logging_with(self.level, self.format)
    }
}
