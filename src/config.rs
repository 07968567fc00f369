//! Run configuration: where repositories live and where outputs go.
//!
//! Configuration is loaded from TOML, for example:
//!
//! ```toml
//! output_dir = "organized_sources"
//!
//! [scan]
//! skip_hidden = true
//! skip_root_files = false
//!
//! [[repositories]]
//! name = "ibro"
//! path = "ibro"
//! url = "https://git.luna-app.eu/ibro/services.git"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::OrganizeError;
use crate::report::{COMBINED_DIR, SUMMARY_FILE};
use crate::scan::ScanOptions;

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "organized_sources";

/// Configuration file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "organize-sources.toml";

/// Built-in repositories: name and upstream URL, checked out under their name
pub const DEFAULT_REPOSITORIES: &[(&str, &str)] = &[
    ("ibro", "https://git.luna-app.eu/ibro/services.git"),
    ("50n50", "https://git.luna-app.eu/50n50/sources.git"),
];

/// One repository working tree to scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,
    /// Local path to an already materialized working tree
    pub path: PathBuf,
    /// Upstream location, recorded in the summary only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub repositories: Vec<RepositoryConfig>,
    pub scan: ScanOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            repositories: DEFAULT_REPOSITORIES
                .iter()
                .map(|(name, url)| RepositoryConfig {
                    name: name.to_string(),
                    path: PathBuf::from(name),
                    url: Some(url.to_string()),
                })
                .collect(),
            scan: ScanOptions::default(),
        }
    }
}

impl Config {
    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, OrganizeError> {
        let config: Config =
            toml::from_str(content).map_err(|e| OrganizeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, OrganizeError> {
        let content = fs::read_to_string(path).map_err(|e| {
            OrganizeError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| OrganizeError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for a run.
    ///
    /// An explicit path wins; otherwise the first existing file among
    /// [`Config::search_paths`] is loaded, falling back to built-in defaults.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self, OrganizeError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::search_paths(working_dir).into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Candidate configuration files, most specific first
    pub fn search_paths(working_dir: &Path) -> Vec<PathBuf> {
        let mut paths = vec![working_dir.join(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("organize-sources").join("config.toml"));
        }
        paths
    }

    /// Apply command-line overrides.
    ///
    /// Any `--repo` entry replaces the configured repository list entirely.
    pub fn with_overrides(
        mut self,
        output_dir: Option<PathBuf>,
        repositories: Vec<RepositoryConfig>,
    ) -> Result<Self, OrganizeError> {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if !repositories.is_empty() {
            self.repositories = repositories;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), OrganizeError> {
        let mut seen = HashSet::new();
        for repo in &self.repositories {
            validate_repository_name(&repo.name)?;
            if !seen.insert(repo.name.as_str()) {
                return Err(OrganizeError::Config(format!(
                    "repository '{}' is configured more than once",
                    repo.name
                )));
            }
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(OrganizeError::Config("output_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Repository names become output directory names, so keep them plain
pub fn validate_repository_name(name: &str) -> Result<(), OrganizeError> {
    if name.is_empty() {
        return Err(OrganizeError::Config("repository name must not be empty".to_string()));
    }
    if name == COMBINED_DIR || name == SUMMARY_FILE {
        return Err(OrganizeError::Config(format!(
            "repository name '{name}' is reserved"
        )));
    }
    if name.starts_with('.') || name.contains(&['/', '\\'][..]) {
        return Err(OrganizeError::Config(format!(
            "invalid repository name '{name}': must not start with '.' or contain path separators"
        )));
    }
    Ok(())
}

/// Parse a `NAME=PATH` repository argument
pub fn parse_repository_arg(arg: &str) -> Result<RepositoryConfig, String> {
    let (name, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{arg}'"))?;
    let name = name.trim();
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing path for repository '{name}'"));
    }
    validate_repository_name(name).map_err(|e| e.to_string())?;
    Ok(RepositoryConfig {
        name: name.to_string(),
        path: PathBuf::from(path),
        url: None,
    })
}
