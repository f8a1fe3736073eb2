use crate::config::ProjectConfig;
use crate::remapping::RemappingTable;
use crate::{ConfigError, ConfigResult};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// File-based configuration loader
pub struct FileLoader;

impl FileLoader {
    /// Load project configuration from a TOML file
    pub async fn load_toml<P: AsRef<Path>>(path: P) -> ConfigResult<ProjectConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;

        let config: ProjectConfig = toml::from_str(&content)?;

        config.validate()?;
        debug!(path = %path.display(), "Loaded TOML project configuration");
        Ok(config)
    }

    /// Load project configuration from a JSON file
    pub async fn load_json<P: AsRef<Path>>(path: P) -> ConfigResult<ProjectConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;

        let config: ProjectConfig = serde_json::from_str(&content)?;

        config.validate()?;
        debug!(path = %path.display(), "Loaded JSON project configuration");
        Ok(config)
    }

    /// Auto-detect file format and load project configuration
    pub async fn load_auto<P: AsRef<Path>>(path: P) -> ConfigResult<ProjectConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::load_toml(path).await,
            Some("json") => Self::load_json(path).await,
            Some(ext) => Err(ConfigError::InvalidFormat(format!(
                "Unsupported file extension: {}",
                ext
            ))),
            None => {
                // Try TOML first, then JSON; report the TOML failure if both fail
                let toml_error = match Self::load_toml(path).await {
                    Ok(config) => return Ok(config),
                    Err(e) => e,
                };
                match Self::load_json(path).await {
                    Ok(config) => Ok(config),
                    Err(json_error) => {
                        debug!(path = %path.display(), error = %json_error, "JSON fallback failed");
                        Err(toml_error)
                    }
                }
            }
        }
    }

    /// Save project configuration to a TOML file
    pub async fn save_toml<P: AsRef<Path>>(config: &ProjectConfig, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::InvalidFormat(format!("TOML serialization failed: {}", e)))?;

        fs::write(path, content).await?;

        Ok(())
    }

    /// Save project configuration to a JSON file
    pub async fn save_json<P: AsRef<Path>>(config: &ProjectConfig, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(config)?;

        fs::write(path, content).await?;

        Ok(())
    }

    /// Load a remapping definition file.
    ///
    /// A missing file yields an empty table; any other read failure is an error.
    pub async fn load_remappings<P: AsRef<Path>>(path: P) -> ConfigResult<RemappingTable> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Remappings file not found, imports will not be remapped");
                return Ok(RemappingTable::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let table = RemappingTable::parse(&content);
        debug!(path = %path.display(), rules = table.len(), "Loaded remappings");
        Ok(table)
    }
}
