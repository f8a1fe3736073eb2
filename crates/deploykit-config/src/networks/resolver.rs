use super::profiles::{default_profiles, AccountPolicy, GasSetting, NetworkProfile, RpcSource};
use super::registry::ChainRegistry;
use crate::error::{ConfigError, ConfigResult};
use crate::loader::env::Secrets;
use crate::secret::SecretString;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Timeout applied when a profile declares none
pub const DEFAULT_TIMEOUT_MS: u64 = 40_000;

/// Host suffix of templated RPC endpoints
pub const DEFAULT_PROVIDER_DOMAIN: &str = "infura.io";

/// Settings shared by every resolved network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub provider_domain: String,
    pub default_timeout_ms: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            provider_domain: DEFAULT_PROVIDER_DOMAIN.to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ResolverSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.provider_domain.trim().is_empty() || self.provider_domain.contains('/') {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid provider domain '{}'",
                self.provider_domain
            )));
        }

        if self.default_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "Default timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Signing accounts of a resolved network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSource {
    /// HD-wallet accounts derived from a seed phrase
    Mnemonic(SecretString),
    /// Raw private keys, in order
    ExplicitKeys(Vec<SecretString>),
}

/// Live-network snapshot replayed by the local network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForkingConfig {
    #[serde(serialize_with = "serialize_redacted_url")]
    pub url: String,
    pub block_number: u64,
}

/// Connection and authentication profile of one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    /// Symbolic name in the chain registry
    pub name: String,
    pub chain_id: u64,
    #[serde(serialize_with = "serialize_redacted_url")]
    pub rpc_url: String,
    pub accounts: AccountSource,
    pub timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<GasSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forking: Option<ForkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_api_key: Option<SecretString>,
}

/// Turns symbolic network names into [`NetworkConfig`]s.
///
/// Resolution reads only the registry, the profile table and the secrets
/// captured at construction; it never touches the process environment or the
/// network.
#[derive(Debug, Clone)]
pub struct NetworkResolver {
    registry: ChainRegistry,
    profiles: Vec<NetworkProfile>,
    settings: ResolverSettings,
    secrets: Secrets,
}

impl NetworkResolver {
    pub fn new(registry: ChainRegistry, secrets: Secrets) -> Self {
        Self {
            registry,
            profiles: default_profiles(),
            settings: ResolverSettings::default(),
            secrets,
        }
    }

    pub fn with_profiles(mut self, profiles: Vec<NetworkProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn profiles(&self) -> &[NetworkProfile] {
        &self.profiles
    }

    /// Resolve a symbolic registry name.
    ///
    /// A registered name without a profile gets the standard policy: templated
    /// endpoint, mnemonic accounts, default timeout.
    pub fn resolve(&self, symbolic_name: &str) -> ConfigResult<NetworkConfig> {
        self.registry.lookup(symbolic_name)?;

        match self.profiles.iter().find(|p| p.chain == symbolic_name) {
            Some(profile) => self.resolve_profile(profile),
            None => self.resolve_profile(&NetworkProfile::standard(symbolic_name, symbolic_name)),
        }
    }

    /// Resolve a deployment key such as `arbitrum`, falling back to a registry name
    pub fn resolve_key(&self, key: &str) -> ConfigResult<NetworkConfig> {
        match self.profiles.iter().find(|p| p.key == key) {
            Some(profile) => self.resolve_profile(profile),
            None => self.resolve(key),
        }
    }

    /// Resolve every profile, keyed by deployment key. Fails on the first error.
    pub fn resolve_all(&self) -> ConfigResult<BTreeMap<String, NetworkConfig>> {
        let mut networks = BTreeMap::new();
        for profile in &self.profiles {
            let config = self.resolve_profile(profile)?;
            networks.insert(profile.key.clone(), config);
        }
        info!(networks = networks.len(), "Resolved network configurations");
        Ok(networks)
    }

    pub fn resolve_profile(&self, profile: &NetworkProfile) -> ConfigResult<NetworkConfig> {
        let entry = self.registry.lookup(&profile.chain)?;

        let rpc_url = self.rpc_url(profile)?;
        let accounts = self.accounts(profile)?;
        let timeout_ms = profile
            .timeout_ms
            .unwrap_or(self.settings.default_timeout_ms);

        let forking = profile
            .fork_block
            .map(|block_number| {
                Ok::<_, ConfigError>(ForkingConfig {
                    url: self.secrets.primary_rpc_url()?.expose().to_string(),
                    block_number,
                })
            })
            .transpose()?;

        let explorer_api_key = profile
            .explorer
            .and_then(|explorer| self.secrets.explorer_key(explorer).cloned());

        debug!(
            network = %profile.key,
            chain = %entry.symbolic_name,
            chain_id = entry.chain_id,
            timeout_ms,
            forked = forking.is_some(),
            "Resolved network"
        );

        Ok(NetworkConfig {
            name: entry.symbolic_name.clone(),
            chain_id: entry.chain_id,
            rpc_url,
            accounts,
            timeout_ms,
            gas: profile.gas,
            forking,
            explorer_api_key,
        })
    }

    fn rpc_url(&self, profile: &NetworkProfile) -> ConfigResult<String> {
        match &profile.rpc {
            RpcSource::Literal(url) => Ok(url.clone()),
            RpcSource::PrimaryUrl => Ok(self.secrets.primary_rpc_url()?.expose().to_string()),
            RpcSource::Templated => Ok(format!(
                "https://{}.{}/v3/{}",
                profile.chain,
                self.settings.provider_domain,
                self.secrets.provider_api_key()?.expose()
            )),
        }
    }

    fn accounts(&self, profile: &NetworkProfile) -> ConfigResult<AccountSource> {
        match profile.accounts {
            AccountPolicy::Mnemonic => Ok(AccountSource::Mnemonic(self.secrets.mnemonic()?.clone())),
            AccountPolicy::ExplicitKey => Ok(AccountSource::ExplicitKeys(vec![self
                .secrets
                .private_key()?
                .clone()])),
        }
    }
}

/// Keep scheme and host of a URL; anything after may carry an API key
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();
            let has_tail = parsed.path() != "/" || parsed.query().is_some();
            format!(
                "{}://{}{}{}",
                parsed.scheme(),
                host,
                port,
                if has_tail { "/<redacted>" } else { "" }
            )
        }
        Err(_) => "<redacted>".to_string(),
    }
}

fn serialize_redacted_url<S: Serializer>(url: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&redact_url(url))
}
