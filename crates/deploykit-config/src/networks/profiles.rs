use crate::loader::env::Explorer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Block height the local network forks mainnet from
pub const DEFAULT_FORK_BLOCK: u64 = 16_474_174;

/// Endpoint of the in-process development network
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Where a network's RPC endpoint comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcSource {
    /// Fixed, well-known public endpoint
    Literal(String),
    /// The primary network URL secret
    PrimaryUrl,
    /// `https://{name}.{provider_domain}/v3/{api_key}`
    Templated,
}

/// Which signing accounts a network uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountPolicy {
    /// Accounts derived from the HD-wallet mnemonic
    Mnemonic,
    /// A single raw private key
    ExplicitKey,
}

/// Gas limit handed to the deployment runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasSetting {
    Auto,
    Fixed(u64),
}

impl Serialize for GasSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GasSetting::Auto => serializer.serialize_str("auto"),
            GasSetting::Fixed(limit) => serializer.serialize_u64(*limit),
        }
    }
}

impl<'de> Deserialize<'de> for GasSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Limit(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) if text.eq_ignore_ascii_case("auto") => Ok(GasSetting::Auto),
            Raw::Text(text) => Err(serde::de::Error::custom(format!(
                "expected \"auto\" or a gas limit, got \"{}\"",
                text
            ))),
            Raw::Limit(limit) => Ok(GasSetting::Fixed(limit)),
        }
    }
}

/// Static resolution policy for one deployment target.
///
/// `key` is the name the deployment runner knows the network by, `chain` the
/// symbolic name in the chain registry. They differ for e.g. `arbitrum`, which
/// deploys to `arbitrum-mainnet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub key: String,
    pub chain: String,
    pub rpc: RpcSource,
    pub accounts: AccountPolicy,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub gas: Option<GasSetting>,
    /// Pinned block for networks that replay a mainnet snapshot
    #[serde(default)]
    pub fork_block: Option<u64>,
    #[serde(default)]
    pub explorer: Option<Explorer>,
}

impl NetworkProfile {
    /// Templated endpoint with mnemonic accounts and the default timeout
    pub fn standard(key: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            chain: chain.into(),
            rpc: RpcSource::Templated,
            accounts: AccountPolicy::Mnemonic,
            timeout_ms: None,
            gas: None,
            fork_block: None,
            explorer: None,
        }
    }

    pub fn with_rpc(mut self, rpc: RpcSource) -> Self {
        self.rpc = rpc;
        self
    }

    pub fn with_accounts(mut self, accounts: AccountPolicy) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_gas(mut self, gas: GasSetting) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_fork_block(mut self, block_number: u64) -> Self {
        self.fork_block = Some(block_number);
        self
    }

    pub fn with_explorer(mut self, explorer: Explorer) -> Self {
        self.explorer = Some(explorer);
        self
    }
}

/// Deployment targets of the project
pub fn default_profiles() -> Vec<NetworkProfile> {
    vec![
        NetworkProfile::standard("hardhat", "hardhat")
            .with_rpc(RpcSource::Literal(LOCAL_RPC_URL.to_string()))
            .with_gas(GasSetting::Auto)
            .with_fork_block(DEFAULT_FORK_BLOCK),
        NetworkProfile::standard("arbitrum", "arbitrum-mainnet").with_explorer(Explorer::Arbiscan),
        NetworkProfile::standard("avalanche", "avalanche")
            .with_rpc(RpcSource::Literal(
                "https://api.avax.network/ext/bc/C/rpc".to_string(),
            ))
            .with_explorer(Explorer::Snowtrace),
        NetworkProfile::standard("bsc", "bsc")
            .with_rpc(RpcSource::Literal(
                "https://bsc-dataseed1.binance.org".to_string(),
            ))
            .with_explorer(Explorer::BscScan),
        NetworkProfile::standard("mainnet", "mainnet")
            .with_rpc(RpcSource::PrimaryUrl)
            .with_accounts(AccountPolicy::ExplicitKey)
            .with_explorer(Explorer::Etherscan),
        NetworkProfile::standard("optimism", "optimism-mainnet")
            .with_explorer(Explorer::OptimismScan),
        NetworkProfile::standard("polygon-mainnet", "polygon-mainnet")
            .with_accounts(AccountPolicy::ExplicitKey)
            .with_timeout(100_000)
            .with_explorer(Explorer::PolygonScan),
        NetworkProfile::standard("polygon-mumbai", "polygon-mumbai")
            .with_explorer(Explorer::PolygonScan),
        NetworkProfile::standard("rinkeby", "rinkeby").with_explorer(Explorer::Etherscan),
    ]
}
