use crate::config::ProjectConfig;
use crate::networks::{AccountSource, ChainRegistry, NetworkConfig, NetworkProfile};
use crate::{ConfigError, ConfigResult};
use std::collections::{BTreeMap, HashSet};

/// URL schemes accepted for RPC endpoints
const RPC_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];

/// Configuration validation utilities
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Registry invariants: unique names, unique non-zero chain ids
    pub fn validate_registry(registry: &ChainRegistry) -> ConfigResult<()> {
        let mut names = HashSet::new();
        let mut ids = HashSet::new();

        for entry in registry.entries() {
            if entry.symbolic_name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Network name cannot be empty".to_string(),
                ));
            }

            if entry.chain_id == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "Chain id for {} must be greater than 0",
                    entry.symbolic_name
                )));
            }

            if !names.insert(entry.symbolic_name.as_str()) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Network {} is registered twice",
                    entry.symbolic_name
                )));
            }

            if !ids.insert(entry.chain_id) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Chain id {} is registered twice",
                    entry.chain_id
                )));
            }
        }

        Ok(())
    }

    /// Every profile targets a registered chain under a unique key
    pub fn validate_profiles(
        registry: &ChainRegistry,
        profiles: &[NetworkProfile],
    ) -> ConfigResult<()> {
        let mut keys = HashSet::new();

        for profile in profiles {
            if !keys.insert(profile.key.as_str()) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Network key {} is defined twice",
                    profile.key
                )));
            }

            registry.lookup(&profile.chain)?;

            if profile.timeout_ms == Some(0) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Timeout for {} must be greater than 0",
                    profile.key
                )));
            }

            if profile.fork_block == Some(0) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Fork block for {} must be pinned to a real block",
                    profile.key
                )));
            }
        }

        Ok(())
    }

    /// Check a resolved network profile
    pub fn validate_network(config: &NetworkConfig) -> ConfigResult<()> {
        Self::validate_rpc_url(&config.name, &config.rpc_url)?;

        if config.chain_id == 0 {
            return Err(ConfigError::ValidationFailed(format!(
                "Chain id for {} must be greater than 0",
                config.name
            )));
        }

        if config.timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(format!(
                "Timeout for {} must be greater than 0",
                config.name
            )));
        }

        match &config.accounts {
            AccountSource::Mnemonic(mnemonic) => {
                if mnemonic.is_empty() {
                    return Err(ConfigError::ValidationFailed(format!(
                        "Mnemonic for {} cannot be empty",
                        config.name
                    )));
                }
            }
            AccountSource::ExplicitKeys(keys) => {
                if keys.is_empty() || keys.iter().any(|key| key.is_empty()) {
                    return Err(ConfigError::ValidationFailed(format!(
                        "Explicit keys for {} cannot be empty",
                        config.name
                    )));
                }
            }
        }

        if let Some(forking) = &config.forking {
            Self::validate_rpc_url(&config.name, &forking.url)?;
            if forking.block_number == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "Fork block for {} must be pinned to a real block",
                    config.name
                )));
            }
        }

        Ok(())
    }

    /// Check a full set of resolved networks against the project configuration
    pub fn validate_deployment(
        project: &ProjectConfig,
        networks: &BTreeMap<String, NetworkConfig>,
    ) -> ConfigResult<()> {
        project.validate()?;

        for network in networks.values() {
            Self::validate_network(network)?;
        }

        if !networks.contains_key(&project.default_network) {
            return Err(ConfigError::ValidationFailed(format!(
                "Default network {} is not among the configured networks",
                project.default_network
            )));
        }

        Ok(())
    }

    fn validate_rpc_url(network: &str, raw: &str) -> ConfigResult<()> {
        let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
            network: network.to_string(),
            reason: e.to_string(),
        })?;

        if !RPC_SCHEMES.contains(&parsed.scheme()) {
            return Err(ConfigError::InvalidUrl {
                network: network.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        if parsed.host().is_none() {
            return Err(ConfigError::InvalidUrl {
                network: network.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(())
    }
}
