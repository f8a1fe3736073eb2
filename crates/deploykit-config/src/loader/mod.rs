//! Configuration loading and environment handling

pub mod env;
pub mod file;
pub mod validation;

pub use env::{EnvLoader, Explorer, Secrets};
pub use file::FileLoader;
pub use validation::ConfigValidator;

use crate::config::{ProjectConfig, DEFAULT_CONFIG_FILE};
use crate::networks::{default_registry, NetworkConfig, NetworkResolver};
use crate::remapping::RemappingTable;
use crate::sources::SourceFilter;
use crate::ConfigResult;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything the compiler toolchain and the deployment runner need for one invocation
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub project: ProjectConfig,
    pub networks: BTreeMap<String, NetworkConfig>,
    pub remappings: RemappingTable,
    pub source_filter: SourceFilter,
}

impl ResolvedConfig {
    /// Profile of the project's default network
    pub fn default_network(&self) -> Option<&NetworkConfig> {
        self.networks.get(&self.project.default_network)
    }
}

/// Main configuration loader
pub struct ConfigLoader {
    project_root: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(project_root: P) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load the project configuration with overrides from the process environment.
    ///
    /// Without an explicit path, `deploykit.toml` is looked up in the project
    /// root and the standard locations; defaults are used when none exists.
    pub async fn load_project(&self, config_path: Option<&Path>) -> ConfigResult<ProjectConfig> {
        self.load_project_with(config_path, EnvLoader::process_env)
            .await
    }

    /// Load the project configuration with overrides read through `lookup`
    pub async fn load_project_with<F>(
        &self,
        config_path: Option<&Path>,
        lookup: F,
    ) -> ConfigResult<ProjectConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let found = match config_path {
            Some(path) => Some(self.project_root.join(path)),
            None => crate::ConfigUtils::find_config_file(&self.project_root, DEFAULT_CONFIG_FILE).ok(),
        };

        let mut config = match found {
            Some(path) => {
                info!(path = %path.display(), "Loading project configuration");
                FileLoader::load_auto(path).await?
            }
            None => {
                debug!("No project configuration file, using defaults");
                ProjectConfig::default()
            }
        };

        EnvLoader::apply_overrides_with(&mut config, lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the remapping table named by the project configuration
    pub async fn load_remappings(&self, project: &ProjectConfig) -> ConfigResult<RemappingTable> {
        FileLoader::load_remappings(self.project_root.join(&project.remappings_file)).await
    }

    /// Full pipeline reading secrets and overrides from `.env` and the process environment
    pub async fn load(&self, config_path: Option<&Path>) -> ConfigResult<ResolvedConfig> {
        EnvLoader::load_dotenv(&self.project_root)?;
        self.load_with_env(config_path, EnvLoader::process_env)
            .await
    }

    /// Full pipeline reading secrets and overrides through `lookup`
    pub async fn load_with_env<F>(
        &self,
        config_path: Option<&Path>,
        lookup: F,
    ) -> ConfigResult<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secrets = EnvLoader::load_secrets_with(&lookup)?;
        let project = self.load_project_with(config_path, &lookup).await?;
        self.resolve(project, secrets).await
    }

    /// Full pipeline with explicitly provided secrets and no environment overrides.
    ///
    /// All-or-nothing: the first unresolvable network aborts the load.
    pub async fn load_with_secrets(
        &self,
        config_path: Option<&Path>,
        secrets: Secrets,
    ) -> ConfigResult<ResolvedConfig> {
        let project = self.load_project_with(config_path, |_| None).await?;
        self.resolve(project, secrets).await
    }

    async fn resolve(
        &self,
        mut project: ProjectConfig,
        secrets: Secrets,
    ) -> ConfigResult<ResolvedConfig> {
        project.gas_reporter.enabled |= secrets.report_gas;

        let registry = default_registry();
        let resolver = NetworkResolver::new(registry, secrets).with_settings(project.resolver.clone());

        ConfigValidator::validate_registry(resolver.registry())?;
        ConfigValidator::validate_profiles(resolver.registry(), resolver.profiles())?;

        let networks = resolver.resolve_all()?;
        ConfigValidator::validate_deployment(&project, &networks)?;

        let remappings = self.load_remappings(&project).await?;
        let source_filter = SourceFilter::from(&project.source_filter);

        info!(
            networks = networks.len(),
            remappings = remappings.len(),
            default_network = %project.default_network,
            "Configuration resolved"
        );

        Ok(ResolvedConfig {
            project,
            networks,
            remappings,
            source_filter,
        })
    }
}
