//! Configuration structures and types
pub mod logging;
pub mod project;

// Re-export main config types
pub use logging::LoggingConfig;
pub use project::{
    AbiExporterConfig, BytecodeHash, CompilerConfig, ContractSizerConfig, GasReporterConfig,
    OptimizerConfig, PathsConfig, ProjectConfig, SolidityConfig, SourceFilterConfig,
    DEFAULT_CONFIG_FILE,
};
