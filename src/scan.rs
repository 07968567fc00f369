//! Repository scanning: enumerate JSON descriptor files and parse them.
//!
//! A [`Scanner`] is a lazy iterator over one repository working tree. Each
//! item is either a parsed [`SourceRecord`] or the
//! [`OrganizeError::MalformedSourceFile`] explaining why a file was skipped,
//! so one bad file never stops the scan.

use glob::{glob, Paths, Pattern};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::classify::classify;
use crate::error::OrganizeError;
use crate::models::record::string_field;
use crate::models::SourceRecord;

/// Extension of descriptor files
pub const JSON_EXTENSION: &str = "json";

/// Filters applied while walking a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Ignore any file whose relative path has a component starting with `.`
    pub skip_hidden: bool,
    /// Ignore descriptor files sitting directly in the repository root
    pub skip_root_files: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            skip_hidden: true,
            skip_root_files: false,
        }
    }
}

impl ScanOptions {
    /// Whether a path relative to the scan root passes the filters
    pub fn accepts(&self, relative: &Path) -> bool {
        let components: Vec<_> = relative.components().collect();
        if self.skip_root_files && components.len() < 2 {
            return false;
        }
        if self.skip_hidden {
            let hidden = components
                .iter()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
            if hidden {
                return false;
            }
        }
        true
    }
}

pub type ScanItem = Result<SourceRecord, OrganizeError>;

/// Lazy scan over one repository working tree
pub struct Scanner {
    repository: String,
    root: PathBuf,
    options: ScanOptions,
    paths: Paths,
}

/// Start scanning `root` on behalf of `repository`.
///
/// Fails with [`OrganizeError::RepositoryUnavailable`] when `root` is not an
/// existing directory. Traversal order is whatever the filesystem walk
/// produces; callers needing a stable order must sort.
pub fn scan(repository: &str, root: &Path, options: &ScanOptions) -> Result<Scanner, OrganizeError> {
    let unavailable = |reason: String| OrganizeError::RepositoryUnavailable {
        repository: repository.to_string(),
        path: root.to_path_buf(),
        reason,
    };

    if !root.exists() {
        return Err(unavailable("path does not exist".to_string()));
    }
    if !root.is_dir() {
        return Err(unavailable("path is not a directory".to_string()));
    }

    // glob drops leading `./` from its matches, so match against the
    // canonical root to keep `strip_prefix` exact
    let root_canon = root
        .canonicalize()
        .map_err(|e| unavailable(format!("canonicalize failed: {e}")))?;
    let pattern = format!(
        "{}/**/*.{JSON_EXTENSION}",
        Pattern::escape(&root_canon.to_string_lossy())
    );
    let paths = glob(&pattern).map_err(|e| unavailable(format!("invalid scan pattern: {e}")))?;

    Ok(Scanner {
        repository: repository.to_string(),
        root: root_canon,
        options: options.clone(),
        paths,
    })
}

impl Scanner {
    fn relative_path(&self, path: &Path) -> Result<PathBuf, OrganizeError> {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                self.malformed(
                    path,
                    format!("path is outside repository root {}", self.root.display()),
                )
            })
    }

    fn malformed(&self, relative: &Path, reason: String) -> OrganizeError {
        OrganizeError::MalformedSourceFile {
            repository: self.repository.clone(),
            path: normalize_path(relative),
            reason,
        }
    }

    fn load(&self, path: &Path, relative: &Path) -> ScanItem {
        let bytes = fs::read(path).map_err(|e| self.malformed(relative, format!("read failed: {e}")))?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| self.malformed(relative, format!("invalid JSON: {e}")))?;

        let raw = match value {
            Value::Object(raw) => raw,
            other => {
                return Err(self.malformed(
                    relative,
                    format!("top-level value is {}, not an object", value_kind(&other)),
                ))
            }
        };

        let declared_type = string_field(&raw, "type");
        let record = SourceRecord {
            source_name: string_field(&raw, "sourceName"),
            category: classify(declared_type.as_deref()),
            declared_type,
            raw,
            origin_repository: self.repository.clone(),
            origin_path: normalize_path(relative),
        };
        debug!(
            repository = %record.origin_repository,
            path = %record.origin_path,
            category = %record.category,
            "Parsed source descriptor"
        );
        Ok(record)
    }
}

impl Iterator for Scanner {
    type Item = ScanItem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.paths.next()? {
                Ok(path) => path,
                Err(e) => {
                    let relative = match self.relative_path(e.path()) {
                        Ok(relative) => relative,
                        Err(err) => return Some(Err(err)),
                    };
                    if !self.options.accepts(&relative) {
                        continue;
                    }
                    return Some(Err(self.malformed(&relative, e.error().to_string())));
                }
            };

            if !path.is_file() {
                continue;
            }
            let relative = match self.relative_path(&path) {
                Ok(relative) => relative,
                Err(err) => return Some(Err(err)),
            };
            if !self.options.accepts(&relative) {
                continue;
            }
            return Some(self.load(&path, &relative));
        }
    }
}

/// Normalize path separators to forward slashes.
pub fn normalize_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
