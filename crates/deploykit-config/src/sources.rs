//! Source-path filtering applied after the compiler discovers its inputs.
//!
//! The filter only ever narrows the discovered set: paths are never added,
//! duplicated or reordered.

use crate::config::SourceFilterConfig;
use crate::error::ConfigResult;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of Solidity sources
pub const SOLIDITY_EXTENSION: &str = "sol";

/// How an exclusion pattern is matched against a source path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The path string contains the pattern anywhere.
    ///
    /// `"Ignore"` excludes both `ConstantsIgnore.sol` and `IgnoreAll.sol`.
    #[default]
    Substring,

    /// A whole path component equals the pattern, or the file stem does.
    PathSegment,
}

impl MatchPolicy {
    pub fn matches(&self, path: &Path, pattern: &str) -> bool {
        match self {
            MatchPolicy::Substring => path.to_string_lossy().contains(pattern),
            MatchPolicy::PathSegment => {
                path.components()
                    .any(|component| component.as_os_str() == OsStr::new(pattern))
                    || path.file_stem() == Some(OsStr::new(pattern))
            }
        }
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "substring" => Ok(MatchPolicy::Substring),
            "path_segment" | "segment" => Ok(MatchPolicy::PathSegment),
            _ => Err(crate::error::ConfigError::InvalidFormat(format!(
                "Unknown match policy: {}",
                s
            ))),
        }
    }
}

/// Removes excluded paths from a discovered source set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    pattern: String,
    policy: MatchPolicy,
}

impl SourceFilter {
    /// Substring filter, the behavior of the compile hook
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            policy: MatchPolicy::Substring,
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn excludes(&self, path: impl AsRef<Path>) -> bool {
        self.policy.matches(path.as_ref(), &self.pattern)
    }

    /// Keep the paths that do not match, in their original order
    pub fn apply<P, I>(&self, paths: I) -> Vec<P>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let mut dropped = 0usize;
        let kept: Vec<P> = paths
            .into_iter()
            .filter(|path| {
                let excluded = self.excludes(path);
                if excluded {
                    dropped += 1;
                    debug!(path = %path.as_ref().display(), pattern = %self.pattern, "Excluding source");
                }
                !excluded
            })
            .collect();

        debug!(kept = kept.len(), dropped, "Filtered source paths");
        kept
    }
}

impl From<&SourceFilterConfig> for SourceFilter {
    fn from(config: &SourceFilterConfig) -> Self {
        SourceFilter::new(config.exclude.clone()).with_policy(config.policy)
    }
}

/// Substring-filter `paths` against `pattern`
pub fn filter<P: AsRef<Path>>(paths: Vec<P>, pattern: &str) -> Vec<P> {
    SourceFilter::new(pattern).apply(paths)
}

/// Recursively collect Solidity sources under `root`, sorted by path
pub fn discover_sources(root: impl AsRef<Path>) -> ConfigResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    collect_sources(root.as_ref(), &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_sources(dir: &Path, found: &mut Vec<PathBuf>) -> ConfigResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed
        if entry.file_type()?.is_dir() {
            collect_sources(&path, found)?;
        } else if path.extension() == Some(OsStr::new(SOLIDITY_EXTENSION)) {
            found.push(path);
        }
    }
    Ok(())
}
