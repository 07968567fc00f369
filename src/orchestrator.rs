//! Drives a full run: scan each repository, aggregate, then write once.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::aggregate::{Aggregate, Aggregator};
use crate::config::Config;
use crate::error::{Diagnostic, OrganizeError};
use crate::report::ReportWriter;
use crate::scan::scan;

/// Result of a completed run
#[derive(Debug)]
pub struct RunReport {
    pub output_dir: PathBuf,
    pub aggregate: Aggregate,
    /// Every non-fatal issue, in the order it was hit
    pub diagnostics: Vec<Diagnostic>,
    /// Repositories that were scanned
    pub processed: Vec<String>,
    /// Repositories skipped because their working tree was missing
    pub skipped: Vec<String>,
    pub files_written: usize,
}

impl RunReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Run the pipeline for every configured repository, in configuration order.
///
/// A missing repository or malformed file becomes a diagnostic. The only
/// error returned is [`OrganizeError::NoOutputsWritten`].
pub fn run(config: &Config) -> Result<RunReport, OrganizeError> {
    let mut aggregator = Aggregator::new();
    let mut diagnostics = Vec::new();
    let mut processed = Vec::new();
    let mut skipped = Vec::new();

    for repo in &config.repositories {
        let scanner = match scan(&repo.name, &repo.path, &config.scan) {
            Ok(scanner) => scanner,
            Err(e) => {
                warn!("Skipping repository: {e}");
                diagnostics.push(Diagnostic::from(&e));
                skipped.push(repo.name.clone());
                continue;
            }
        };

        info!(repository = %repo.name, path = %repo.path.display(), "Scanning repository");
        aggregator.begin_repository(&repo.name, repo.url.as_deref());
        let errors = aggregator.absorb(&repo.name, scanner);
        diagnostics.extend(errors.iter().map(Diagnostic::from));
        processed.push(repo.name.clone());
    }

    let aggregate = aggregator.finish();
    for name in &processed {
        if let Some(stats) = aggregate.stats.repositories.get(name) {
            info!(
                repository = %name,
                found = stats.files_found,
                processed = stats.total(),
                failed = stats.files_failed,
                "Repository scanned"
            );
        }
    }

    let outcome = ReportWriter::new(&config.output_dir).write(&aggregate, &diagnostics)?;
    diagnostics.extend(outcome.failures.iter().map(Diagnostic::from));

    Ok(RunReport {
        output_dir: config.output_dir.clone(),
        aggregate,
        diagnostics,
        processed,
        skipped,
        files_written: outcome.written.len(),
    })
}
