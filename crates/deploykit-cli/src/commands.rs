//! CLI subcommand implementations.

use anyhow::{Context as _, Result};
use deploykit_config::{
    clean_abi_filenames, default_registry, discover_sources, AbiExtractor, ConfigLoader,
    EnvLoader, FileLoader, NetworkResolver, ProjectConfig, RemappingTable, RpcSource, Secrets,
    SourceFilter, DEFAULT_CONFIG_FILE,
};
use futures::future::try_join_all;
use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Project location shared by every subcommand
pub struct Context {
    loader: ConfigLoader,
    config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            loader: ConfigLoader::new(root),
            config_path,
        }
    }

    pub fn root(&self) -> &Path {
        self.loader.project_root()
    }

    /// Project config with overrides applied, after `.env` has joined the environment
    pub async fn load_project(&self) -> Result<ProjectConfig> {
        EnvLoader::load_dotenv(self.root())?;
        Ok(self.loader.load_project(self.config_path.as_deref()).await?)
    }

    /// Secrets from the environment; mandatory ones must be present
    fn secrets(&self) -> Result<Secrets> {
        Ok(EnvLoader::load_secrets()?)
    }
}

pub fn networks(project: &ProjectConfig) -> Result<()> {
    let resolver = NetworkResolver::new(default_registry(), Secrets::default())
        .with_settings(project.resolver.clone());

    println!("Registered chains:");
    for entry in resolver.registry().entries() {
        println!("  {:<18} {:>10}", entry.symbolic_name, entry.chain_id);
    }

    println!();
    println!("Network profiles:");
    for profile in resolver.profiles() {
        let rpc = match &profile.rpc {
            RpcSource::Literal(url) => url.clone(),
            RpcSource::PrimaryUrl => "$MAINNET_URL".to_string(),
            RpcSource::Templated => format!(
                "https://{}.{}/v3/$INFURA_API_KEY",
                profile.chain, project.resolver.provider_domain
            ),
        };
        let timeout = profile
            .timeout_ms
            .unwrap_or(project.resolver.default_timeout_ms);
        let default_marker = if profile.key == project.default_network {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<18} chain={:<18} accounts={:?} timeout={}ms rpc={}{}",
            profile.key, profile.chain, profile.accounts, timeout, rpc, default_marker
        );
    }

    Ok(())
}

pub fn resolve(ctx: &Context, project: &ProjectConfig, name: Option<String>, all: bool) -> Result<()> {
    let resolver = NetworkResolver::new(default_registry(), ctx.secrets()?)
        .with_settings(project.resolver.clone());

    let output = if all {
        serde_json::to_string_pretty(&resolver.resolve_all()?)?
    } else {
        let name = name.context("a network name or --all is required")?;
        serde_json::to_string_pretty(&resolver.resolve_key(&name)?)?
    };

    println!("{}", output);
    Ok(())
}

pub async fn remap(
    ctx: &Context,
    project: &ProjectConfig,
    files: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let table = ctx.loader.load_remappings(project).await?;
    if table.is_empty() {
        warn!("No remapping rules loaded, sources pass through unchanged");
    }

    match out_dir {
        Some(dir) => {
            let written = write_remapped(&table, ctx.root(), &files, &dir).await?;
            info!(files = written.len(), out_dir = %dir.display(), "Remapped sources");
        }
        None => {
            let rewritten = rewrite_files(&table, &files).await?;
            for (file, source) in files.iter().zip(rewritten) {
                if files.len() > 1 {
                    println!("// {}", file.display());
                }
                print!("{}", source);
            }
        }
    }

    Ok(())
}

async fn rewrite_files(table: &RemappingTable, files: &[PathBuf]) -> Result<Vec<String>> {
    try_join_all(files.iter().map(|file| rewrite_file(table, file))).await
}

async fn rewrite_file(table: &RemappingTable, file: &Path) -> Result<String> {
    let source = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    Ok(table.rewrite_source(&source))
}

/// Rewrite `files` under `out_dir`, each at its path relative to `root`.
///
/// Nothing is written when two inputs map to the same target.
async fn write_remapped(
    table: &RemappingTable,
    root: &Path,
    files: &[PathBuf],
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let targets = output_targets(root, files, out_dir)?;

    try_join_all(files.iter().zip(&targets).map(|(file, target)| async move {
        let rewritten = rewrite_file(table, file).await?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(target, rewritten)
            .await
            .with_context(|| format!("writing {}", target.display()))
    }))
    .await?;

    Ok(targets)
}

fn output_targets(root: &Path, files: &[PathBuf], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    files
        .iter()
        .map(|file| {
            // Root, prefix and `..` components are dropped so targets stay under out_dir
            let relative: PathBuf = file
                .strip_prefix(root)
                .unwrap_or(file)
                .components()
                .filter(|component| matches!(component, Component::Normal(_)))
                .collect();
            if relative.as_os_str().is_empty() {
                anyhow::bail!("{} has no file name", file.display());
            }

            let target = out_dir.join(relative);
            if !seen.insert(target.clone()) {
                anyhow::bail!(
                    "{} maps to {}, which another input already writes",
                    file.display(),
                    target.display()
                );
            }
            Ok(target)
        })
        .collect()
}

pub fn sources(
    ctx: &Context,
    project: &ProjectConfig,
    dir: Option<PathBuf>,
    exclude: Option<String>,
) -> Result<()> {
    let (discovered, kept, filter) = select_sources(ctx.root(), project, dir, exclude)?;

    for path in &kept {
        let shown = path.strip_prefix(ctx.root()).unwrap_or(path);
        println!("{}", shown.display());
    }
    info!(
        discovered,
        kept = kept.len(),
        pattern = filter.pattern(),
        "Filtered sources"
    );

    Ok(())
}

/// Discovered source count, the sources kept after filtering and the filter used
fn select_sources(
    root: &Path,
    project: &ProjectConfig,
    dir: Option<PathBuf>,
    exclude: Option<String>,
) -> Result<(usize, Vec<PathBuf>, SourceFilter)> {
    let dir = root.join(dir.unwrap_or_else(|| project.paths.sources.clone()));
    let discovered = discover_sources(&dir)?;
    let count = discovered.len();

    let filter = match exclude {
        Some(pattern) => SourceFilter::new(pattern).with_policy(project.source_filter.policy),
        None => SourceFilter::from(&project.source_filter),
    };
    Ok((count, filter.apply(discovered), filter))
}

pub fn abi(ctx: &Context, project: &ProjectConfig, clean: bool) -> Result<()> {
    let extractor = AbiExtractor::from_config(ctx.root(), &project.abi_exporter);
    let extracted = extractor.extract()?;

    for abi in &extracted {
        println!("{} <- {}", abi.output.display(), abi.source_path);
    }

    if clean && extractor.output_dir().is_dir() {
        let renamed = clean_abi_filenames(extractor.output_dir())?;
        info!(renamed = renamed.len(), "Cleaned ABI file names");
    }

    Ok(())
}

pub async fn check(ctx: &Context) -> Result<()> {
    let resolved = ctx
        .loader
        .load(ctx.config_path.as_deref())
        .await
        .context("configuration did not resolve")?;

    let summary: BTreeMap<&str, u64> = resolved
        .networks
        .iter()
        .map(|(key, network)| (key.as_str(), network.chain_id))
        .collect();

    println!("Configuration OK");
    println!("  default network: {}", resolved.project.default_network);
    println!("  networks:        {}", serde_json::to_string(&summary)?);
    println!("  remapping rules: {}", resolved.remappings.len());
    println!("  source exclude:  {:?}", resolved.source_filter.pattern());
    println!("  gas reporter:    {}", resolved.project.gas_reporter.enabled);

    Ok(())
}

pub async fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = ctx
        .root()
        .join(ctx.config_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)));

    if path.exists() && !force {
        anyhow::bail!("{} already exists, pass --force to overwrite", path.display());
    }

    let config = ProjectConfig::default();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => FileLoader::save_json(&config, &path).await?,
        _ => FileLoader::save_toml(&config, &path).await?,
    }

    println!("Wrote {}", path.display());
    Ok(())
}
