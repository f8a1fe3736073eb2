//! Deployment configuration for Solidity smart-contract projects
//!
//! This crate resolves symbolic network names into complete connection
//! profiles, rewrites import paths through a remapping table before
//! compilation, and narrows the set of sources handed to the compiler.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod loader;
pub mod networks;
pub mod remapping;
pub mod secret;
pub mod sources;
pub mod utils;

// Re-exports for convenience
pub use artifacts::{clean_abi_filenames, AbiExtractor, ExtractedAbi};
pub use config::*;
pub use loader::*;
pub use networks::*;
pub use remapping::{is_import_line, rewrite, RemappingRule, RemappingTable};
pub use secret::SecretString;
pub use sources::{discover_sources, filter, MatchPolicy, SourceFilter};
pub use utils::ConfigUtils;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
