//! Chain registry and network resolution

pub mod profiles;
pub mod registry;
pub mod resolver;

pub use profiles::{
    default_profiles, AccountPolicy, GasSetting, NetworkProfile, RpcSource, DEFAULT_FORK_BLOCK,
    LOCAL_RPC_URL,
};
pub use registry::{default_registry, ChainRegistry, ChainRegistryEntry, DEFAULT_CHAINS};
pub use resolver::{
    redact_url, AccountSource, ForkingConfig, NetworkConfig, NetworkResolver, ResolverSettings,
    DEFAULT_PROVIDER_DOMAIN, DEFAULT_TIMEOUT_MS,
};
