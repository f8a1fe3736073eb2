use crate::config::ProjectConfig;
use crate::secret::SecretString;
use crate::sources::MatchPolicy;
use crate::{ConfigError, ConfigResult};
use deploykit_utils::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Environment variable names read by the loader
pub mod vars {
    /// HD-wallet seed phrase
    pub const MNEMONIC: &str = "MNEMONIC";
    /// API key interpolated into templated RPC endpoints
    pub const PROVIDER_API_KEY: &str = "INFURA_API_KEY";
    /// Base RPC URL of the primary network, also the fork source
    pub const PRIMARY_RPC_URL: &str = "MAINNET_URL";
    /// Raw private key for explicit-key networks
    pub const PRIVATE_KEY: &str = "PK";
    /// Enables the gas reporter when set to anything non-empty
    pub const REPORT_GAS: &str = "REPORT_GAS";

    pub const DEFAULT_NETWORK: &str = "DEPLOYKIT_DEFAULT_NETWORK";
    pub const LOG_LEVEL: &str = "DEPLOYKIT_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "DEPLOYKIT_LOG_FORMAT";
    pub const SOURCE_EXCLUDE: &str = "DEPLOYKIT_SOURCE_EXCLUDE";
    pub const SOURCE_MATCH: &str = "DEPLOYKIT_SOURCE_MATCH";
    pub const PROVIDER_DOMAIN: &str = "DEPLOYKIT_PROVIDER_DOMAIN";
    pub const DEFAULT_TIMEOUT_MS: &str = "DEPLOYKIT_DEFAULT_TIMEOUT_MS";
}

/// Block explorers used by contract verification tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Explorer {
    Etherscan,
    Arbiscan,
    Snowtrace,
    BscScan,
    OptimismScan,
    PolygonScan,
}

impl Explorer {
    pub const ALL: [Explorer; 6] = [
        Explorer::Etherscan,
        Explorer::Arbiscan,
        Explorer::Snowtrace,
        Explorer::BscScan,
        Explorer::OptimismScan,
        Explorer::PolygonScan,
    ];

    pub fn env_var(&self) -> &'static str {
        match self {
            Explorer::Etherscan => "ETHERSCAN_API_KEY",
            Explorer::Arbiscan => "ARBISCAN_API_KEY",
            Explorer::Snowtrace => "SNOWTRACE_API_KEY",
            Explorer::BscScan => "BSCSCAN_API_KEY",
            Explorer::OptimismScan => "OPTIMISM_API_KEY",
            Explorer::PolygonScan => "POLYGONSCAN_API_KEY",
        }
    }
}

/// Secrets captured from the environment once at startup.
///
/// Every field is optional here; the resolver reports a
/// [`ConfigError::MissingSecret`] only when a network actually needs the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub mnemonic: Option<SecretString>,
    pub provider_api_key: Option<SecretString>,
    pub primary_rpc_url: Option<SecretString>,
    pub private_key: Option<SecretString>,
    pub explorer_keys: BTreeMap<Explorer, SecretString>,
    pub report_gas: bool,
}

impl Secrets {
    /// Read every known variable through `lookup`. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map(SecretString::from)
        };

        let explorer_keys = Explorer::ALL
            .iter()
            .filter_map(|explorer| read(explorer.env_var()).map(|key| (*explorer, key)))
            .collect();

        Self {
            mnemonic: read(vars::MNEMONIC),
            provider_api_key: read(vars::PROVIDER_API_KEY),
            primary_rpc_url: read(vars::PRIMARY_RPC_URL),
            private_key: read(vars::PRIVATE_KEY),
            explorer_keys,
            report_gas: read(vars::REPORT_GAS).is_some(),
        }
    }

    pub fn mnemonic(&self) -> ConfigResult<&SecretString> {
        require(&self.mnemonic, vars::MNEMONIC)
    }

    pub fn provider_api_key(&self) -> ConfigResult<&SecretString> {
        require(&self.provider_api_key, vars::PROVIDER_API_KEY)
    }

    pub fn primary_rpc_url(&self) -> ConfigResult<&SecretString> {
        require(&self.primary_rpc_url, vars::PRIMARY_RPC_URL)
    }

    pub fn private_key(&self) -> ConfigResult<&SecretString> {
        require(&self.private_key, vars::PRIVATE_KEY)
    }

    pub fn explorer_key(&self, explorer: Explorer) -> Option<&SecretString> {
        self.explorer_keys.get(&explorer)
    }

    /// Fail on the first mandatory variable that is absent
    pub fn ensure_mandatory(&self) -> ConfigResult<()> {
        self.mnemonic()?;
        self.provider_api_key()?;
        self.primary_rpc_url()?;
        Ok(())
    }
}

fn require<'a>(value: &'a Option<SecretString>, var: &str) -> ConfigResult<&'a SecretString> {
    value
        .as_ref()
        .ok_or_else(|| ConfigError::MissingSecret(var.to_string()))
}

/// Environment variable-based configuration loader
pub struct EnvLoader;

impl EnvLoader {
    /// Load `<project_root>/.env` into the process environment if present.
    ///
    /// Variables already set in the environment are not overridden.
    pub fn load_dotenv(project_root: &Path) -> ConfigResult<()> {
        let path = project_root.join(".env");
        if !path.exists() {
            debug!(path = %path.display(), "No .env file found");
            return Ok(());
        }

        dotenv::from_path(&path).map_err(|e| {
            ConfigError::EnvironmentError(format!("Failed to load {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded .env file");
        Ok(())
    }

    /// Read one variable from the process environment.
    ///
    /// The only place the process environment is consulted; everything else
    /// takes a lookup.
    pub fn process_env(key: &str) -> Option<String> {
        env::var(key).ok()
    }

    /// Capture secrets from the process environment, failing fast on missing mandatory ones
    pub fn load_secrets() -> ConfigResult<Secrets> {
        Self::load_secrets_with(Self::process_env)
    }

    /// Capture secrets through `lookup`, failing fast on missing mandatory ones
    pub fn load_secrets_with<F>(lookup: F) -> ConfigResult<Secrets>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secrets = Secrets::from_lookup(lookup);
        secrets.ensure_mandatory()?;

        if secrets.private_key.is_none() {
            warn!(
                var = vars::PRIVATE_KEY,
                "No private key set, explicit-key networks will fail to resolve"
            );
        }
        Ok(secrets)
    }

    /// Apply project configuration overrides read through `lookup`
    pub fn apply_overrides_with<F>(config: &mut ProjectConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup(vars::DEFAULT_NETWORK) {
            config.default_network = network;
        }

        if let Some(level) = lookup(vars::LOG_LEVEL) {
            config.logging.level = LogLevel::from_str(&level).map_err(|_| {
                ConfigError::EnvironmentError(format!("Invalid {}: {}", vars::LOG_LEVEL, level))
            })?;
        }

        if let Some(format) = lookup(vars::LOG_FORMAT) {
            config.logging.format = LogFormat::from_str(&format).map_err(|_| {
                ConfigError::EnvironmentError(format!("Invalid {}: {}", vars::LOG_FORMAT, format))
            })?;
        }

        if let Some(pattern) = lookup(vars::SOURCE_EXCLUDE) {
            config.source_filter.exclude = pattern;
        }

        if let Some(policy) = lookup(vars::SOURCE_MATCH) {
            config.source_filter.policy = MatchPolicy::from_str(&policy).map_err(|_| {
                ConfigError::EnvironmentError(format!("Invalid {}: {}", vars::SOURCE_MATCH, policy))
            })?;
        }

        if let Some(domain) = lookup(vars::PROVIDER_DOMAIN) {
            config.resolver.provider_domain = domain;
        }

        if let Some(timeout) = lookup(vars::DEFAULT_TIMEOUT_MS) {
            config.resolver.default_timeout_ms = timeout.parse().map_err(|_| {
                ConfigError::EnvironmentError(format!(
                    "Invalid {}: {}",
                    vars::DEFAULT_TIMEOUT_MS,
                    timeout
                ))
            })?;
        }

        Ok(())
    }
}
