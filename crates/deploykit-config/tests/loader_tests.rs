use deploykit_config::*;
use deploykit_utils::{LogFormat, LogLevel};
use std::collections::HashMap;
use std::fs;
use tempfile::{tempdir, Builder, NamedTempFile};

fn secrets(pairs: &[(&str, &str)]) -> Secrets {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Secrets::from_lookup(move |key| map.get(key).cloned())
}

fn temp_file(suffix: &str) -> NamedTempFile {
    Builder::new().suffix(suffix).tempfile().unwrap()
}

fn complete_secrets() -> Secrets {
    secrets(&[
        ("MNEMONIC", "seed words"),
        ("INFURA_API_KEY", "infura-key"),
        ("MAINNET_URL", "https://eth-mainnet.example.com/v2/key"),
        ("PK", "0x01"),
        ("REPORT_GAS", "1"),
    ])
}

/// Test the complete configuration loading pipeline
#[tokio::test]
async fn test_complete_config_pipeline() {
    let temp_dir = tempdir().unwrap();

    fs::write(
        temp_dir.path().join("deploykit.toml"),
        r#"
default_network = "arbitrum"
remappings_file = "remappings.txt"

[source_filter]
exclude = "Ignore"
policy = "path_segment"

[resolver]
default_timeout_ms = 60000

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("remappings.txt"),
        "@oz/=lib/openzeppelin/\nforge-std/=lib/forge-std/src/\n",
    )
    .unwrap();

    let loader = ConfigLoader::new(temp_dir.path());
    let resolved = loader
        .load_with_secrets(None, complete_secrets())
        .await
        .unwrap();

    assert_eq!(resolved.project.default_network, "arbitrum");
    assert_eq!(resolved.project.logging.level, LogLevel::Debug);
    assert_eq!(resolved.project.logging.format, LogFormat::Json);
    assert!(resolved.project.gas_reporter.enabled);

    assert_eq!(resolved.networks.len(), default_profiles().len());
    let default = resolved.default_network().unwrap();
    assert_eq!(default.chain_id, 42161);
    assert_eq!(default.timeout_ms, 60_000);
    assert_eq!(resolved.networks["polygon-mainnet"].timeout_ms, 100_000);

    assert_eq!(resolved.remappings.len(), 2);
    assert_eq!(resolved.source_filter.pattern(), "Ignore");
    assert_eq!(resolved.source_filter.policy(), MatchPolicy::PathSegment);
}

#[tokio::test]
async fn explicit_secrets_pipeline_ignores_process_environment() {
    std::env::set_var("REPORT_GAS", "1");
    std::env::set_var("DEPLOYKIT_DEFAULT_TIMEOUT_MS", "1234");

    let temp_dir = tempdir().unwrap();
    let loader = ConfigLoader::new(temp_dir.path());
    let mut given = complete_secrets();
    given.report_gas = false;

    let resolved = loader.load_with_secrets(None, given).await.unwrap();

    std::env::remove_var("REPORT_GAS");
    std::env::remove_var("DEPLOYKIT_DEFAULT_TIMEOUT_MS");

    assert!(!resolved.project.gas_reporter.enabled);
    assert_eq!(resolved.networks["rinkeby"].timeout_ms, DEFAULT_TIMEOUT_MS);
}

#[tokio::test]
async fn injected_environment_drives_secrets_and_overrides() {
    let temp_dir = tempdir().unwrap();
    let env: HashMap<&str, &str> = [
        ("MNEMONIC", "seed words"),
        ("INFURA_API_KEY", "infura-key"),
        ("MAINNET_URL", "https://eth.example.com"),
        ("PK", "0x01"),
        ("REPORT_GAS", "true"),
        ("DEPLOYKIT_DEFAULT_TIMEOUT_MS", "1234"),
        ("DEPLOYKIT_SOURCE_EXCLUDE", "Mock"),
    ]
    .into_iter()
    .collect();

    let resolved = ConfigLoader::new(temp_dir.path())
        .load_with_env(None, |key| env.get(key).map(|v| v.to_string()))
        .await
        .unwrap();

    assert!(resolved.project.gas_reporter.enabled);
    assert_eq!(resolved.networks["rinkeby"].timeout_ms, 1234);
    assert_eq!(resolved.networks["polygon-mainnet"].timeout_ms, 100_000);
    assert_eq!(resolved.source_filter.pattern(), "Mock");
}

#[tokio::test]
async fn explicit_config_path_must_exist() {
    let temp_dir = tempdir().unwrap();
    let loader = ConfigLoader::new(temp_dir.path());

    let resolved = loader
        .load_with_secrets(Some(std::path::Path::new("deploykit.toml")), complete_secrets())
        .await;
    assert!(matches!(resolved, Err(ConfigError::FileNotFound(_))));
}

#[tokio::test]
async fn pipeline_aborts_on_first_missing_secret() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("deploykit.toml"), "default_network = \"hardhat\"\n").unwrap();

    let loader = ConfigLoader::new(temp_dir.path());
    let result = loader
        .load_with_secrets(
            None,
            secrets(&[
                ("MNEMONIC", "seed words"),
                ("INFURA_API_KEY", "infura-key"),
                ("MAINNET_URL", "https://eth.example.com"),
            ]),
        )
        .await;

    match result {
        Err(ConfigError::MissingSecret(var)) => assert_eq!(var, "PK"),
        other => panic!("expected MissingSecret, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn unknown_default_network_fails_validation() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("deploykit.toml"), "default_network = \"goerli\"\n").unwrap();

    let loader = ConfigLoader::new(temp_dir.path());
    let result = loader.load_with_secrets(None, complete_secrets()).await;

    assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
}

#[test]
fn strict_secret_loading_names_missing_variable() {
    let result = EnvLoader::load_secrets_with(|key| match key {
        "MNEMONIC" => Some("seed words".to_string()),
        "MAINNET_URL" => Some("https://eth.example.com".to_string()),
        _ => None,
    });

    match result {
        Err(ConfigError::MissingSecret(var)) => assert_eq!(var, "INFURA_API_KEY"),
        other => panic!("expected MissingSecret, got {:?}", other),
    }
}

#[tokio::test]
async fn test_toml_config_save_and_load() {
    let file = temp_file(".toml");

    let mut config = ProjectConfig::default();
    config.default_network = "polygon-mumbai".to_string();
    config.solidity.compilers[0].optimizer.runs = 200;

    FileLoader::save_toml(&config, file.path()).await.unwrap();
    let loaded = FileLoader::load_auto(file.path()).await.unwrap();

    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_json_config_save_and_load() {
    let file = temp_file(".json");

    let mut config = ProjectConfig::default();
    config.gas_reporter.currency = "EUR".to_string();
    config.abi_exporter.name_prefix = String::new();

    FileLoader::save_json(&config, file.path()).await.unwrap();
    let loaded = FileLoader::load_auto(file.path()).await.unwrap();

    assert_eq!(loaded, config);
}

#[tokio::test]
async fn partial_file_fills_in_defaults() {
    let file = temp_file(".toml");
    fs::write(
        file.path(),
        r#"
[[solidity.compilers]]
version = "0.8.20"
"#,
    )
    .unwrap();

    let loaded = FileLoader::load_toml(file.path()).await.unwrap();
    assert_eq!(loaded.solidity.compilers.len(), 1);
    assert_eq!(loaded.solidity.compilers[0].version, "0.8.20");
    assert!(!loaded.solidity.compilers[0].via_ir);
    assert_eq!(loaded.default_network, "hardhat");
    assert_eq!(loaded.resolver.default_timeout_ms, DEFAULT_TIMEOUT_MS);
}

#[tokio::test]
async fn invalid_files_are_rejected() {
    let bad_version = temp_file(".toml");
    fs::write(
        bad_version.path(),
        "[[solidity.compilers]]\nversion = \"^0.8.0\"\n",
    )
    .unwrap();
    assert!(matches!(
        FileLoader::load_toml(bad_version.path()).await,
        Err(ConfigError::ValidationFailed(_))
    ));

    let bad_syntax = temp_file(".toml");
    fs::write(bad_syntax.path(), "default_network = ").unwrap();
    assert!(matches!(
        FileLoader::load_toml(bad_syntax.path()).await,
        Err(ConfigError::Toml(_))
    ));

    let unsupported = temp_file(".yaml");
    assert!(matches!(
        FileLoader::load_auto(unsupported.path()).await,
        Err(ConfigError::InvalidFormat(_))
    ));
}

#[tokio::test]
async fn extensionless_files_fall_back_to_json() {
    let dir = tempdir().unwrap();

    let json = dir.path().join("deploykit");
    fs::write(&json, r#"{ "default_network": "bsc" }"#).unwrap();
    assert_eq!(FileLoader::load_auto(&json).await.unwrap().default_network, "bsc");

    let garbage = dir.path().join("broken");
    fs::write(&garbage, "default_network = ").unwrap();
    assert!(matches!(
        FileLoader::load_auto(&garbage).await,
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn validator_checks_resolved_networks() {
    let resolver = NetworkResolver::new(default_registry(), complete_secrets());
    let mut network = resolver.resolve("rinkeby").unwrap();
    assert!(ConfigValidator::validate_network(&network).is_ok());

    network.rpc_url = "ftp://rinkeby.example.com".to_string();
    assert!(matches!(
        ConfigValidator::validate_network(&network),
        Err(ConfigError::InvalidUrl { .. })
    ));

    network.rpc_url = "https://rinkeby.example.com".to_string();
    network.timeout_ms = 0;
    assert!(ConfigValidator::validate_network(&network).is_err());
}

#[test]
fn validator_rejects_profiles_for_unregistered_chains() {
    let registry = default_registry();
    let mut profiles = default_profiles();
    assert!(ConfigValidator::validate_profiles(&registry, &profiles).is_ok());

    profiles.push(NetworkProfile::standard("goerli", "goerli"));
    assert!(matches!(
        ConfigValidator::validate_profiles(&registry, &profiles),
        Err(ConfigError::UnknownNetwork(_))
    ));

    let duplicated = vec![
        NetworkProfile::standard("bsc", "bsc"),
        NetworkProfile::standard("bsc", "bsc"),
    ];
    assert!(ConfigValidator::validate_profiles(&registry, &duplicated).is_err());
}

#[test]
fn errors_convert_into_core_errors() {
    let err: deploykit_utils::DeployKitError = ConfigError::MissingSecret("MNEMONIC".to_string()).into();
    assert!(matches!(err, deploykit_utils::DeployKitError::MissingSecret(var) if var == "MNEMONIC"));

    let err: deploykit_utils::DeployKitError = ConfigError::UnknownNetwork("goerli".to_string()).into();
    assert!(matches!(err, deploykit_utils::DeployKitError::UnknownNetwork(name) if name == "goerli"));
}
