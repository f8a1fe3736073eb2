use crate::error::{ConfigError, ConfigResult};
use crate::networks::ResolverSettings;
use crate::sources::MatchPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::LoggingConfig;

/// Default project configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "deploykit.toml";

/// Project-level build and deployment configuration.
///
/// Most of this is declarative data handed to the compiler toolchain and the
/// reporting plugins. The pieces with behavior attached are `source_filter`,
/// `remappings_file` and `resolver`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Network used when none is named explicitly
    pub default_network: String,

    /// Remapping definition file, relative to the project root
    pub remappings_file: PathBuf,

    /// Exclusion applied to the compiler's discovered sources
    pub source_filter: SourceFilterConfig,

    /// Endpoint templating and timeout defaults for network resolution
    pub resolver: ResolverSettings,

    /// Project directory layout
    pub paths: PathsConfig,

    /// Solidity compiler settings
    pub solidity: SolidityConfig,

    /// Gas reporter plugin settings
    pub gas_reporter: GasReporterConfig,

    /// ABI export settings
    pub abi_exporter: AbiExporterConfig,

    /// Contract sizer plugin settings
    pub contract_sizer: ContractSizerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFilterConfig {
    /// Paths matching this pattern are removed from the compiler input
    pub exclude: String,

    /// How `exclude` is matched against a path
    pub policy: MatchPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub artifacts: PathBuf,
    pub cache: PathBuf,
    pub sources: PathBuf,
    pub tests: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidityConfig {
    pub compilers: Vec<CompilerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Exact solc version, e.g. `0.8.19`
    pub version: String,

    /// Compile through the IR pipeline
    #[serde(default)]
    pub via_ir: bool,

    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Metadata hash appended to the bytecode
    #[serde(default)]
    pub bytecode_hash: BytecodeHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub enabled: bool,
    pub runs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BytecodeHash {
    #[default]
    None,
    Ipfs,
    Bzzr1,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasReporterConfig {
    /// Set from `REPORT_GAS` at load time
    pub enabled: bool,
    pub currency: String,
    pub src: PathBuf,
    pub exclude_contracts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbiExporterConfig {
    /// Destination directory for exported ABI files
    pub path: PathBuf,

    /// Directory holding compiled artifact JSON
    pub artifacts_dir: PathBuf,

    /// Source prefixes whose contracts get exported
    pub include_paths: Vec<String>,

    /// Source path fragments that are never exported
    pub exclude_paths: Vec<String>,

    /// Prefix prepended to every exported contract name
    pub name_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractSizerConfig {
    pub run_on_compile: bool,
    pub only: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_network: "hardhat".to_string(),
            remappings_file: PathBuf::from("remappings.txt"),
            source_filter: SourceFilterConfig::default(),
            resolver: ResolverSettings::default(),
            paths: PathsConfig::default(),
            solidity: SolidityConfig::default(),
            gas_reporter: GasReporterConfig::default(),
            abi_exporter: AbiExporterConfig::default(),
            contract_sizer: ContractSizerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceFilterConfig {
    fn default() -> Self {
        Self {
            exclude: "Constants.sol".to_string(),
            policy: MatchPolicy::Substring,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from("./artifacts"),
            cache: PathBuf::from("./cache"),
            sources: PathBuf::from("./src"),
            tests: PathBuf::from("./src/test"),
        }
    }
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            compilers: vec![CompilerConfig {
                version: "0.8.19".to_string(),
                via_ir: true,
                optimizer: OptimizerConfig::default(),
                bytecode_hash: BytecodeHash::None,
            }],
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: 100_000,
        }
    }
}

impl Default for GasReporterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            currency: "USD".to_string(),
            src: PathBuf::from("./contracts"),
            exclude_contracts: Vec::new(),
        }
    }
}

impl Default for AbiExporterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/abi"),
            artifacts_dir: PathBuf::from("out"),
            include_paths: vec!["src/".to_string()],
            exclude_paths: [
                "node_modules",
                "@openzeppelin",
                "lib/",
                "src/interfaces/",
                "src/libraries/",
                "src/dependencies/",
                "test/",
                "script/",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            name_prefix: "I".to_string(),
        }
    }
}

impl Default for ContractSizerConfig {
    fn default() -> Self {
        Self {
            run_on_compile: true,
            only: vec![":FraxlendPair".to_string()],
        }
    }
}

impl ProjectConfig {
    /// Validate project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_network.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Default network cannot be empty".to_string(),
            ));
        }

        if self.remappings_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Remappings file path cannot be empty".to_string(),
            ));
        }

        // An empty substring matches every path
        if self.source_filter.exclude.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Source exclusion pattern cannot be empty".to_string(),
            ));
        }

        self.resolver.validate()?;

        if self.solidity.compilers.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one Solidity compiler must be configured".to_string(),
            ));
        }

        for compiler in &self.solidity.compilers {
            compiler.validate()?;
        }

        if self.gas_reporter.currency.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Gas reporter currency cannot be empty".to_string(),
            ));
        }

        if self.abi_exporter.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "ABI export path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl CompilerConfig {
    /// Validate compiler settings
    pub fn validate(&self) -> ConfigResult<()> {
        let parts: Vec<&str> = self.version.split('.').collect();
        let well_formed = parts.len() == 3
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

        if !well_formed {
            return Err(ConfigError::ValidationFailed(format!(
                "Compiler version must be an exact x.y.z version, got '{}'",
                self.version
            )));
        }

        if self.optimizer.enabled && self.optimizer.runs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Optimizer runs must be greater than 0 when the optimizer is enabled".to_string(),
            ));
        }

        Ok(())
    }
}
