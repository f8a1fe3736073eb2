use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Configuration utility functions
pub struct ConfigUtils;

impl ConfigUtils {
    /// Find a configuration file, starting at the project root
    pub fn find_config_file(project_root: &Path, filename: &str) -> ConfigResult<PathBuf> {
        let search_paths = vec![
            // Project root
            project_root.to_path_buf(),
            // Config subdirectory
            project_root.join("config"),
            // User config directory
            dirs::config_dir()
                .map(|d| d.join("deploykit"))
                .unwrap_or_else(|| PathBuf::from(".deploykit")),
        ];

        for search_path in search_paths.into_iter() {
            let config_path = search_path.join(filename);
            if config_path.is_file() {
                return Ok(config_path);
            }

            // Also try the other supported format
            let alternate = config_path.with_extension("json");
            if alternate.is_file() {
                return Ok(alternate);
            }
        }

        Err(ConfigError::FileNotFound(format!(
            "Configuration file '{}' not found in standard locations",
            filename
        )))
    }

    /// Create a directory if it doesn't exist
    pub fn ensure_directory<P: AsRef<Path>>(path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        } else if !path.is_dir() {
            return Err(ConfigError::ValidationFailed(format!(
                "Path exists but is not a directory: {}",
                path.display()
            )));
        }
        Ok(())
    }
}
