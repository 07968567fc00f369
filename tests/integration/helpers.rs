//! Test helper functions for integration tests

use anyhow::{Context, Result};
use organize_sources::config::{Config, RepositoryConfig};
use organize_sources::scan::ScanOptions;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Workspace holding repository checkouts and the output directory
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp directory")?,
        })
    }

    pub fn repo_path(&self, repo: &str) -> PathBuf {
        self.temp.path().join("checkouts").join(repo)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.temp.path().join("organized_sources")
    }

    /// Writes a descriptor file into a repository checkout
    pub fn write_source(&self, repo: &str, relative: &str, content: &str) -> Result<()> {
        let path = self.repo_path(repo).join(relative);
        let parent = path.parent().context("Descriptor path has no parent")?;
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Configuration scanning the named repositories in order
    pub fn config(&self, repos: &[&str]) -> Config {
        Config {
            output_dir: self.output_dir(),
            repositories: repos
                .iter()
                .map(|name| RepositoryConfig {
                    name: name.to_string(),
                    path: self.repo_path(name),
                    url: None,
                })
                .collect(),
            scan: ScanOptions::default(),
        }
    }

    /// Parses an output file relative to the output directory
    pub fn read_output(&self, relative: &str) -> Result<Value> {
        read_json(&self.output_dir().join(relative))
    }

    pub fn output_bytes(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.output_dir().join(relative);
        fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

pub fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Length of a JSON array output, panicking on anything else
pub fn array_len(value: &Value) -> usize {
    value.as_array().expect("output should be a JSON array").len()
}
