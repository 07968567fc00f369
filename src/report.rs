//! Serialization of aggregated buckets and the run summary.
//!
//! Layout under the output root:
//!
//! ```text
//! <repository>/<category>.json   one file per repository per category
//! combined/<category>.json       every repository merged per category
//! summary.json                   counts, output digests and diagnostics
//! ```
//!
//! Every category file is written even when its bucket is empty. Files are
//! written through a temporary file in the destination directory and then
//! persisted, so a reader never observes a half-written output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::aggregate::{Aggregate, CategoryBuckets};
use crate::error::{Diagnostic, OrganizeError};
use crate::models::{Category, SourceRecord};

/// Directory holding the cross-repository files
pub const COMBINED_DIR: &str = "combined";

/// Name of the summary file
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatistics {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub count: usize,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub total_sources: usize,
    pub files_found: usize,
    pub files_failed: usize,
    pub sources_by_category: BTreeMap<Category, CategorySummary>,
    pub declared_types: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedSummary {
    pub total_sources: usize,
    pub repositories: Vec<String>,
    pub repository_count: usize,
}

/// Contents of `summary.json`
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub output_dir: String,
    pub total_repositories: usize,
    pub categories: Vec<Category>,
    pub statistics: FileStatistics,
    pub repositories: BTreeMap<String, RepositorySummary>,
    pub combined: BTreeMap<Category, CombinedSummary>,
    pub grand_total: usize,
    /// Output file path relative to the output root, mapped to its SHA-256
    pub outputs: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Summary {
    pub fn build(
        aggregate: &Aggregate,
        output_root: &Path,
        outputs: BTreeMap<String, String>,
        diagnostics: Vec<Diagnostic>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let stats = &aggregate.stats;

        let repositories = aggregate
            .per_repository
            .iter()
            .map(|(name, buckets)| {
                let repo_stats = stats.repositories.get(name).cloned().unwrap_or_default();
                let sources_by_category = buckets
                    .iter()
                    .map(|(category, records)| {
                        let summary = CategorySummary {
                            count: records.len(),
                            sources: records
                                .iter()
                                .map(|r| r.display_name().to_string())
                                .collect(),
                        };
                        (category, summary)
                    })
                    .collect();
                let summary = RepositorySummary {
                    url: repo_stats.url.clone(),
                    total_sources: repo_stats.total(),
                    files_found: repo_stats.files_found,
                    files_failed: repo_stats.files_failed,
                    sources_by_category,
                    declared_types: repo_stats.declared_types,
                };
                (name.clone(), summary)
            })
            .collect();

        let combined = aggregate
            .combined
            .iter()
            .map(|(category, records)| {
                let repos: BTreeSet<&str> = records
                    .iter()
                    .map(|r| r.origin_repository.as_str())
                    .collect();
                let summary = CombinedSummary {
                    total_sources: records.len(),
                    repository_count: repos.len(),
                    repositories: repos.into_iter().map(str::to_string).collect(),
                };
                (category, summary)
            })
            .collect();

        Summary {
            generated_at,
            output_dir: output_root.display().to_string(),
            total_repositories: aggregate.per_repository.len(),
            categories: Category::ALL.to_vec(),
            statistics: FileStatistics {
                files_found: stats.files_found(),
                files_processed: stats.files_processed(),
                files_failed: stats.files_failed(),
            },
            repositories,
            combined,
            grand_total: stats.grand_total(),
            outputs,
            diagnostics,
        }
    }
}

/// What a write pass produced
#[derive(Debug, Default)]
pub struct WriteOutcome {
    /// Relative path to SHA-256 hex digest for each file written
    pub written: BTreeMap<String, String>,
    /// Per-file failures, all recovered
    pub failures: Vec<OrganizeError>,
}

/// Writes category files and the summary under one output root
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_root: PathBuf,
}

impl ReportWriter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Write every output, continuing past per-file failures.
    ///
    /// `diagnostics` from earlier stages are embedded in the summary along
    /// with any write failures hit here. Fails with
    /// [`OrganizeError::NoOutputsWritten`] only when the output root cannot be
    /// created or not a single file could be written.
    pub fn write(
        &self,
        aggregate: &Aggregate,
        diagnostics: &[Diagnostic],
    ) -> Result<WriteOutcome, OrganizeError> {
        fs::create_dir_all(&self.output_root).map_err(|e| OrganizeError::NoOutputsWritten {
            path: self.output_root.clone(),
            reason: e.to_string(),
        })?;

        let mut outcome = WriteOutcome::default();

        for (repository, buckets) in &aggregate.per_repository {
            self.write_buckets(Path::new(repository), buckets, &mut outcome);
        }
        self.write_buckets(Path::new(COMBINED_DIR), &aggregate.combined, &mut outcome);

        let mut all_diagnostics = diagnostics.to_vec();
        all_diagnostics.extend(outcome.failures.iter().map(Diagnostic::from));
        let summary = Summary::build(
            aggregate,
            &self.output_root,
            outcome.written.clone(),
            all_diagnostics,
            Utc::now(),
        );
        self.write_file(Path::new(SUMMARY_FILE), &summary, &mut outcome);

        if outcome.written.is_empty() {
            return Err(OrganizeError::NoOutputsWritten {
                path: self.output_root.clone(),
                reason: format!("all {} output files failed", outcome.failures.len()),
            });
        }

        info!(
            written = outcome.written.len(),
            failed = outcome.failures.len(),
            "Wrote organized sources to {}",
            self.output_root.display()
        );
        Ok(outcome)
    }

    fn write_buckets(&self, dir: &Path, buckets: &CategoryBuckets, outcome: &mut WriteOutcome) {
        let absolute = self.output_root.join(dir);
        if let Err(e) = fs::create_dir_all(&absolute) {
            // Every file in the directory is lost; report each one
            for category in Category::ALL {
                let failure = OrganizeError::OutputWriteFailure {
                    path: absolute.join(category.file_name()),
                    source: io::Error::new(e.kind(), e.to_string()),
                };
                warn!("{failure}");
                outcome.failures.push(failure);
            }
            return;
        }

        for (category, records) in buckets.iter() {
            let payload = raw_payloads(records);
            self.write_file(&dir.join(category.file_name()), &payload, outcome);
        }
    }

    fn write_file<T: Serialize>(&self, relative: &Path, value: &T, outcome: &mut WriteOutcome) {
        let path = self.output_root.join(relative);
        match write_json_atomic(&path, value) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Wrote output file");
                outcome
                    .written
                    .insert(relative_key(relative), sha256_hex(&bytes));
            }
            Err(source) => {
                let failure = OrganizeError::OutputWriteFailure { path, source };
                warn!("{failure}");
                outcome.failures.push(failure);
            }
        }
    }
}

/// Convenience wrapper over [`ReportWriter::write`]
pub fn write(
    aggregate: &Aggregate,
    diagnostics: &[Diagnostic],
    output_root: &Path,
) -> Result<WriteOutcome, OrganizeError> {
    ReportWriter::new(output_root).write(aggregate, diagnostics)
}

fn raw_payloads(records: &[SourceRecord]) -> Vec<&Map<String, Value>> {
    records.iter().map(|r| &r.raw).collect()
}

/// Pretty-print `value` and atomically replace `path` with it.
///
/// Returns the bytes written.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<Vec<u8>> {
    let bytes = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(bytes)
}

fn relative_key(relative: &Path) -> String {
    relative.display().to_string().replace('\\', "/")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
