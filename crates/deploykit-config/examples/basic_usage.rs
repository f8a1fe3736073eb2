use deploykit_config::{
    default_registry, ConfigUtils, FileLoader, NetworkResolver, ProjectConfig, RemappingTable,
    Secrets, SourceFilter,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("deploykit configuration basic usage");
    println!("===================================\n");

    // Example 1: Resolve networks from explicitly provided secrets
    println!("1. Resolving networks:");

    let secrets = Secrets::from_lookup(|key| match key {
        "MNEMONIC" => Some("test test test test test test test test test test test junk".into()),
        "INFURA_API_KEY" => Some("example-key".into()),
        "MAINNET_URL" => Some("https://eth-mainnet.example.com/v2/example".into()),
        "PK" => Some("0x0123".into()),
        _ => None,
    });
    let resolver = NetworkResolver::new(default_registry(), secrets);

    for name in ["hardhat", "mainnet", "polygon-mumbai", "bsc"] {
        let network = resolver.resolve(name)?;
        println!(
            "   {:<15} chain id {:<6} timeout {}ms",
            network.name, network.chain_id, network.timeout_ms
        );
    }

    match resolver.resolve("goerli") {
        Ok(_) => println!("   goerli unexpectedly resolved"),
        Err(e) => println!("   goerli: {}", e),
    }
    println!();

    // Example 2: Remap imports
    println!("2. Remapping imports:");

    let table = RemappingTable::parse("@oz/=lib/openzeppelin/\nforge-std/=lib/forge-std/src/\n");
    let source = "pragma solidity 0.8.19;\nimport \"@oz/token/ERC20.sol\";\n";
    for line in table.rewrite_source(source).lines() {
        println!("   {}", line);
    }
    println!();

    // Example 3: Filter discovered sources
    println!("3. Filtering sources:");

    let filter = SourceFilter::new("Ignore");
    for path in filter.apply(vec!["A.sol", "ConstantsIgnore.sol", "B.sol"]) {
        println!("   {}", path);
    }
    println!();

    // Example 4: Save and reload a project configuration
    println!("4. Saving project configuration:");

    let output_dir = "./examples_output";
    ConfigUtils::ensure_directory(output_dir)?;
    let path = format!("{}/deploykit.toml", output_dir);
    FileLoader::save_toml(&ProjectConfig::default(), &path).await?;
    let loaded = FileLoader::load_toml(&path).await?;
    println!(
        "   Saved {} (default network {})",
        path, loaded.default_network
    );

    Ok(())
}
