use deploykit_config::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn full_secrets() -> Secrets {
    Secrets::from_lookup(lookup(&[
        ("MNEMONIC", "test test test test test test test test test test test junk"),
        ("INFURA_API_KEY", "infura-key"),
        ("MAINNET_URL", "https://eth-mainnet.example.com/v2/alchemy-key"),
        ("PK", "0xabc123"),
        ("ETHERSCAN_API_KEY", "etherscan-key"),
    ]))
}

fn small_registry() -> ChainRegistry {
    ChainRegistry::from_entries([("mainnet", 1), ("polygon-mainnet", 137)]).unwrap()
}

#[test]
fn resolved_chain_id_matches_registry() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());

    for entry in resolver.registry().entries() {
        let network = resolver.resolve(&entry.symbolic_name).unwrap();
        assert_eq!(network.chain_id, entry.chain_id, "{}", entry.symbolic_name);
        assert_eq!(network.name, entry.symbolic_name);
    }
}

#[test]
fn unregistered_name_is_unknown_network() {
    let resolver = NetworkResolver::new(small_registry(), full_secrets());

    for name in ["goerli", "", "Mainnet", "polygon"] {
        match resolver.resolve(name) {
            Err(ConfigError::UnknownNetwork(n)) => assert_eq!(n, name),
            other => panic!("expected UnknownNetwork for {:?}, got {:?}", name, other),
        }
    }
}

#[test]
fn mainnet_without_primary_url_is_missing_secret() {
    let secrets = Secrets::from_lookup(lookup(&[
        ("MNEMONIC", "seed words"),
        ("INFURA_API_KEY", "infura-key"),
        ("PK", "0xabc123"),
    ]));
    let resolver = NetworkResolver::new(small_registry(), secrets);

    match resolver.resolve("mainnet") {
        Err(ConfigError::MissingSecret(var)) => assert_eq!(var, "MAINNET_URL"),
        other => panic!("expected MissingSecret, got {:?}", other),
    }
}

#[test]
fn templated_network_needs_api_key() {
    let secrets = Secrets::from_lookup(lookup(&[("MNEMONIC", "seed words")]));
    let resolver = NetworkResolver::new(default_registry(), secrets);

    match resolver.resolve("polygon-mumbai") {
        Err(ConfigError::MissingSecret(var)) => assert_eq!(var, "INFURA_API_KEY"),
        other => panic!("expected MissingSecret, got {:?}", other),
    }
}

#[test]
fn templated_url_interpolates_name_and_key() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());

    let network = resolver.resolve("polygon-mumbai").unwrap();
    assert_eq!(network.rpc_url, "https://polygon-mumbai.infura.io/v3/infura-key");
    assert_eq!(network.chain_id, 80001);

    let custom = NetworkResolver::new(default_registry(), full_secrets()).with_settings(
        ResolverSettings {
            provider_domain: "rpc.example.org".to_string(),
            ..ResolverSettings::default()
        },
    );
    assert_eq!(
        custom.resolve("rinkeby").unwrap().rpc_url,
        "https://rinkeby.rpc.example.org/v3/infura-key"
    );
}

#[test]
fn literal_endpoints_need_no_api_key() {
    let secrets = Secrets::from_lookup(lookup(&[("MNEMONIC", "seed words")]));
    let resolver = NetworkResolver::new(default_registry(), secrets);

    let bsc = resolver.resolve("bsc").unwrap();
    assert_eq!(bsc.rpc_url, "https://bsc-dataseed1.binance.org");
    assert_eq!(bsc.chain_id, 56);

    let avalanche = resolver.resolve("avalanche").unwrap();
    assert_eq!(avalanche.rpc_url, "https://api.avax.network/ext/bc/C/rpc");
}

#[test]
fn production_networks_sign_with_a_single_explicit_key() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());

    for name in ["mainnet", "polygon-mainnet"] {
        match resolver.resolve(name).unwrap().accounts {
            AccountSource::ExplicitKeys(keys) => {
                assert_eq!(keys.len(), 1);
                assert_eq!(keys[0].expose(), "0xabc123");
            }
            other => panic!("{} should use explicit keys, got {:?}", name, other),
        }
    }

    assert!(matches!(
        resolver.resolve("optimism-mainnet").unwrap().accounts,
        AccountSource::Mnemonic(_)
    ));
}

#[test]
fn explicit_key_network_without_key_is_missing_secret() {
    let secrets = Secrets::from_lookup(lookup(&[
        ("MNEMONIC", "seed words"),
        ("INFURA_API_KEY", "infura-key"),
        ("MAINNET_URL", "https://eth.example.com"),
    ]));
    let resolver = NetworkResolver::new(default_registry(), secrets);

    assert!(matches!(
        resolver.resolve("polygon-mainnet"),
        Err(ConfigError::MissingSecret(var)) if var == "PK"
    ));
}

#[test]
fn timeouts_use_override_or_default() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());

    assert_eq!(resolver.resolve("polygon-mainnet").unwrap().timeout_ms, 100_000);
    assert_eq!(resolver.resolve("rinkeby").unwrap().timeout_ms, DEFAULT_TIMEOUT_MS);

    let slow = NetworkResolver::new(default_registry(), full_secrets()).with_settings(
        ResolverSettings {
            default_timeout_ms: 90_000,
            ..ResolverSettings::default()
        },
    );
    assert_eq!(slow.resolve("rinkeby").unwrap().timeout_ms, 90_000);
    assert_eq!(slow.resolve("polygon-mainnet").unwrap().timeout_ms, 100_000);
}

#[test]
fn local_network_forks_primary_at_pinned_block() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());

    let local = resolver.resolve("hardhat").unwrap();
    assert_eq!(local.rpc_url, LOCAL_RPC_URL);
    assert_eq!(local.gas, Some(GasSetting::Auto));

    let forking = local.forking.expect("local network forks");
    assert_eq!(forking.url, "https://eth-mainnet.example.com/v2/alchemy-key");
    assert_eq!(forking.block_number, DEFAULT_FORK_BLOCK);

    assert!(resolver.resolve("mainnet").unwrap().forking.is_none());
}

#[test]
fn deployment_keys_resolve_to_their_chain() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());

    let arbitrum = resolver.resolve_key("arbitrum").unwrap();
    assert_eq!(arbitrum.name, "arbitrum-mainnet");
    assert_eq!(arbitrum.chain_id, 42161);

    // registry names still work as keys
    assert_eq!(resolver.resolve_key("bsc").unwrap().chain_id, 56);
}

#[test]
fn explorer_keys_are_attached_when_present() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());

    let mainnet = resolver.resolve("mainnet").unwrap();
    assert_eq!(mainnet.explorer_api_key.unwrap().expose(), "etherscan-key");

    let bsc = resolver.resolve("bsc").unwrap();
    assert!(bsc.explorer_api_key.is_none());
}

#[test]
fn registered_chain_without_profile_gets_standard_policy() {
    let mut registry = default_registry();
    registry.register("sepolia", 11155111).unwrap();
    let resolver = NetworkResolver::new(registry, full_secrets());

    let sepolia = resolver.resolve("sepolia").unwrap();
    assert_eq!(sepolia.chain_id, 11155111);
    assert_eq!(sepolia.rpc_url, "https://sepolia.infura.io/v3/infura-key");
    assert!(matches!(sepolia.accounts, AccountSource::Mnemonic(_)));
    assert_eq!(sepolia.timeout_ms, DEFAULT_TIMEOUT_MS);
}

#[test]
fn resolve_all_is_all_or_nothing() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());
    let all = resolver.resolve_all().unwrap();
    assert_eq!(all.len(), default_profiles().len());
    assert_eq!(all["arbitrum"].chain_id, 42161);
    assert_eq!(all["hardhat"].chain_id, 1337);

    let partial = Secrets::from_lookup(lookup(&[
        ("MNEMONIC", "seed words"),
        ("INFURA_API_KEY", "infura-key"),
        ("MAINNET_URL", "https://eth.example.com"),
    ]));
    let resolver = NetworkResolver::new(default_registry(), partial);
    assert!(matches!(
        resolver.resolve_all(),
        Err(ConfigError::MissingSecret(var)) if var == "PK"
    ));
}

#[test]
fn profiles_for_unregistered_chains_fail_resolve_all() {
    let resolver = NetworkResolver::new(small_registry(), full_secrets());
    assert!(matches!(
        resolver.resolve_all(),
        Err(ConfigError::UnknownNetwork(_))
    ));

    let resolver = NetworkResolver::new(small_registry(), full_secrets()).with_profiles(vec![
        NetworkProfile::standard("mainnet", "mainnet")
            .with_rpc(RpcSource::PrimaryUrl)
            .with_accounts(AccountPolicy::ExplicitKey),
        NetworkProfile::standard("polygon-mainnet", "polygon-mainnet"),
    ]);
    let all = resolver.resolve_all().unwrap();
    assert_eq!(all.keys().collect::<Vec<_>>(), vec!["mainnet", "polygon-mainnet"]);
}

#[tokio::test]
async fn resolution_is_order_independent_across_tasks() {
    let resolver = std::sync::Arc::new(NetworkResolver::new(default_registry(), full_secrets()));
    let names: Vec<String> = resolver
        .registry()
        .entries()
        .iter()
        .rev()
        .map(|entry| entry.symbolic_name.clone())
        .collect();

    let handles = names.iter().cloned().map(|name| {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve(&name) })
    });
    let results = futures::future::join_all(handles).await;

    for (name, result) in names.iter().zip(results) {
        let parallel = result.unwrap().unwrap();
        assert_eq!(parallel, resolver.resolve(name).unwrap());
    }
}

#[test]
fn registry_rejects_colliding_entries() {
    let mut registry = small_registry();

    assert!(matches!(
        registry.register("mainnet", 5),
        Err(ConfigError::ValidationFailed(_))
    ));
    assert!(matches!(
        registry.register("ethereum", 1),
        Err(ConfigError::ValidationFailed(_))
    ));
    assert!(matches!(
        registry.register("zero", 0),
        Err(ConfigError::ValidationFailed(_))
    ));
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.name_for_chain_id(137), Some("polygon-mainnet"));
}

#[test]
fn serialized_profiles_do_not_leak_secrets() {
    let resolver = NetworkResolver::new(default_registry(), full_secrets());
    let json = serde_json::to_string(&resolver.resolve_all().unwrap()).unwrap();

    for secret in ["infura-key", "alchemy-key", "0xabc123", "etherscan-key", "junk"] {
        assert!(!json.contains(secret), "leaked {}", secret);
    }
    assert!(json.contains("<redacted>"));
}
