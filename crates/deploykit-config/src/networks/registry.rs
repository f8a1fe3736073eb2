use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Built-in chain table, symbolic name to chain id
pub const DEFAULT_CHAINS: &[(&str, u64)] = &[
    ("arbitrum-mainnet", 42161),
    ("avalanche", 43114),
    ("bsc", 56),
    ("hardhat", 1337),
    ("mainnet", 1),
    ("optimism-mainnet", 10),
    ("polygon-mainnet", 137),
    ("polygon-mumbai", 80001),
    ("rinkeby", 4),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRegistryEntry {
    pub symbolic_name: String,
    pub chain_id: u64,
}

/// Mapping from symbolic network name to chain id.
///
/// Names and chain ids are both unique; insertion order is kept for listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRegistry {
    entries: Vec<ChainRegistryEntry>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting duplicate names, duplicate ids and id 0
    pub fn from_entries<I, S>(entries: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (name, chain_id) in entries {
            registry.register(name, chain_id)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, name: impl Into<String>, chain_id: u64) -> ConfigResult<()> {
        let symbolic_name = name.into();

        if symbolic_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Network name cannot be empty".to_string(),
            ));
        }

        if chain_id == 0 {
            return Err(ConfigError::ValidationFailed(format!(
                "Chain id for {} must be greater than 0",
                symbolic_name
            )));
        }

        if self.contains(&symbolic_name) {
            return Err(ConfigError::ValidationFailed(format!(
                "Network {} is registered twice",
                symbolic_name
            )));
        }

        if let Some(existing) = self.name_for_chain_id(chain_id) {
            return Err(ConfigError::ValidationFailed(format!(
                "Chain id {} is shared by {} and {}",
                chain_id, existing, symbolic_name
            )));
        }

        self.entries.push(ChainRegistryEntry {
            symbolic_name,
            chain_id,
        });
        Ok(())
    }

    /// Look up an entry, failing with [`ConfigError::UnknownNetwork`]
    pub fn lookup(&self, name: &str) -> ConfigResult<&ChainRegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.symbolic_name == name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    pub fn chain_id(&self, name: &str) -> Option<u64> {
        self.lookup(name).ok().map(|entry| entry.chain_id)
    }

    pub fn name_for_chain_id(&self, chain_id: u64) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.chain_id == chain_id)
            .map(|entry| entry.symbolic_name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.symbolic_name == name)
    }

    pub fn entries(&self) -> &[ChainRegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry holding [`DEFAULT_CHAINS`]
pub fn default_registry() -> ChainRegistry {
    let mut registry = ChainRegistry::new();
    for (name, chain_id) in DEFAULT_CHAINS {
        registry.entries.push(ChainRegistryEntry {
            symbolic_name: name.to_string(),
            chain_id: *chain_id,
        });
    }
    registry
}
