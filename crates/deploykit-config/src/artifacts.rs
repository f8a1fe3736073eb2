//! ABI export from compiled contract artifacts.
//!
//! Artifacts are the JSON files a Solidity build writes per contract. Each one
//! whose compilation target lives under an included source prefix gets its
//! `abi` array written to `<output_dir>/<prefix><Name>.json`.

use crate::config::AbiExporterConfig;
use crate::utils::ConfigUtils;
use crate::{ConfigError, ConfigResult};
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One exported ABI file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAbi {
    pub contract: String,
    pub source_path: String,
    pub output: PathBuf,
}

/// Extracts ABIs from a directory of compiled artifacts
#[derive(Debug, Clone)]
pub struct AbiExtractor {
    artifacts_dir: PathBuf,
    output_dir: PathBuf,
    include_paths: Vec<String>,
    exclude_paths: Vec<String>,
    name_prefix: String,
}

impl AbiExtractor {
    pub fn new(artifacts_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let defaults = AbiExporterConfig::default();
        Self {
            artifacts_dir: artifacts_dir.into(),
            output_dir: output_dir.into(),
            include_paths: defaults.include_paths,
            exclude_paths: defaults.exclude_paths,
            name_prefix: defaults.name_prefix,
        }
    }

    /// Extractor for a project, with directories resolved against `project_root`
    pub fn from_config(project_root: &Path, config: &AbiExporterConfig) -> Self {
        Self {
            artifacts_dir: project_root.join(&config.artifacts_dir),
            output_dir: project_root.join(&config.path),
            include_paths: config.include_paths.clone(),
            exclude_paths: config.exclude_paths.clone(),
            name_prefix: config.name_prefix.clone(),
        }
    }

    pub fn with_include_paths(mut self, include_paths: Vec<String>) -> Self {
        self.include_paths = include_paths;
        self
    }

    pub fn with_exclude_paths(mut self, exclude_paths: Vec<String>) -> Self {
        self.exclude_paths = exclude_paths;
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether a contract compiled from `source_path` should be exported
    pub fn should_export(&self, source_path: &str) -> bool {
        if self
            .exclude_paths
            .iter()
            .any(|exclude| source_path.contains(exclude.as_str()))
        {
            return false;
        }

        self.include_paths
            .iter()
            .any(|include| source_path.starts_with(include.as_str()))
    }

    /// Export every eligible ABI.
    ///
    /// Unreadable or malformed artifacts are logged and skipped. A missing
    /// artifacts directory exports nothing.
    pub fn extract(&self) -> ConfigResult<Vec<ExtractedAbi>> {
        if !self.artifacts_dir.is_dir() {
            warn!(dir = %self.artifacts_dir.display(), "Artifacts directory does not exist");
            return Ok(Vec::new());
        }

        ConfigUtils::ensure_directory(&self.output_dir)?;

        let mut artifacts = Vec::new();
        collect_json_files(&self.artifacts_dir, &mut artifacts)?;
        artifacts.sort();
        debug!(count = artifacts.len(), "Found artifact files");

        let mut extracted = Vec::new();
        for artifact in &artifacts {
            match self.extract_one(artifact) {
                Ok(Some(abi)) => extracted.push(abi),
                Ok(None) => {}
                Err(e) => warn!(artifact = %artifact.display(), error = %e, "Skipping artifact"),
            }
        }

        info!(
            exported = extracted.len(),
            output = %self.output_dir.display(),
            "ABI extraction complete"
        );
        Ok(extracted)
    }

    fn extract_one(&self, artifact: &Path) -> ConfigResult<Option<ExtractedAbi>> {
        let content: Value = serde_json::from_str(&fs::read_to_string(artifact)?)?;

        let Some(source_path) = compilation_target(&content) else {
            debug!(artifact = %artifact.display(), "No compilation target");
            return Ok(None);
        };

        if !self.should_export(&source_path) {
            debug!(source = %source_path, "Skipping source");
            return Ok(None);
        }

        let Some(abi) = content.get("abi") else {
            debug!(artifact = %artifact.display(), "Artifact has no ABI");
            return Ok(None);
        };

        let stem = artifact
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| ConfigError::Artifact(format!("Bad file name: {}", artifact.display())))?;
        let contract = format!("{}{}", self.name_prefix, stem);
        let output = self.output_dir.join(format!("{}.json", contract));

        fs::write(&output, serde_json::to_string_pretty(abi)?)?;
        debug!(contract = %contract, source = %source_path, "Extracted ABI");

        Ok(Some(ExtractedAbi {
            contract,
            source_path,
            output,
        }))
    }
}

/// First source path of `metadata.settings.compilationTarget`.
///
/// `metadata` may be embedded either as an object or as a JSON string.
pub fn compilation_target(artifact: &Value) -> Option<String> {
    let metadata = artifact.get("metadata")?;
    let parsed;
    let metadata = match metadata {
        Value::String(raw) => {
            parsed = serde_json::from_str::<Value>(raw).ok()?;
            &parsed
        }
        other => other,
    };

    metadata
        .get("settings")?
        .get("compilationTarget")?
        .as_object()?
        .keys()
        .next()
        .cloned()
}

/// Strip version suffixes from exported names: `IPair.0.8.19.json` becomes `IPair.json`.
///
/// Returns the `(from, to)` pairs that were renamed.
pub fn clean_abi_filenames(dir: impl AsRef<Path>) -> ConfigResult<Vec<(PathBuf, PathBuf)>> {
    let dir = dir.as_ref();
    let mut renamed = Vec::new();

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    files.sort();

    for file in files {
        if file.extension() != Some(OsStr::new("json")) {
            continue;
        }
        let Some(stem) = file.file_stem().and_then(OsStr::to_str) else {
            continue;
        };
        let Some((clean, _)) = stem.split_once('.') else {
            continue;
        };

        let target = file.with_file_name(format!("{}.json", clean));
        match fs::rename(&file, &target) {
            Ok(()) => {
                debug!(from = %file.display(), to = %target.display(), "Renamed ABI file");
                renamed.push((file, target));
            }
            Err(e) => warn!(file = %file.display(), error = %e, "Failed to rename ABI file"),
        }
    }

    Ok(renamed)
}

fn collect_json_files(dir: &Path, found: &mut Vec<PathBuf>) -> ConfigResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed
        if entry.file_type()?.is_dir() {
            collect_json_files(&path, found)?;
        } else if path.extension() == Some(OsStr::new("json")) {
            found.push(path);
        }
    }
    Ok(())
}
