//! Error kinds and the non-fatal diagnostics collected during a run.

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while organizing sources.
///
/// Only [`OrganizeError::NoOutputsWritten`] and [`OrganizeError::Config`]
/// end a run; the other kinds are recovered locally and kept as
/// [`Diagnostic`]s.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("repository '{repository}' is unavailable at {}: {reason}", .path.display())]
    RepositoryUnavailable {
        repository: String,
        path: PathBuf,
        reason: String,
    },
    #[error("malformed source file {path} in '{repository}': {reason}")]
    MalformedSourceFile {
        repository: String,
        path: String,
        reason: String,
    },
    #[error("failed to write {}: {source}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no outputs written to {}: {reason}", .path.display())]
    NoOutputsWritten { path: PathBuf, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
}

impl OrganizeError {
    /// Short label for the error kind
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            OrganizeError::RepositoryUnavailable { .. } => DiagnosticKind::RepositoryUnavailable,
            OrganizeError::MalformedSourceFile { .. } => DiagnosticKind::MalformedSourceFile,
            OrganizeError::OutputWriteFailure { .. } => DiagnosticKind::OutputWriteFailure,
            OrganizeError::NoOutputsWritten { .. } => DiagnosticKind::NoOutputsWritten,
            OrganizeError::Config(_) => DiagnosticKind::Config,
        }
    }

    /// Whether the error ends the run instead of being recorded
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OrganizeError::NoOutputsWritten { .. } | OrganizeError::Config(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    RepositoryUnavailable,
    MalformedSourceFile,
    OutputWriteFailure,
    NoOutputsWritten,
    Config,
}

/// A recorded, non-fatal issue surfaced alongside the run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl From<&OrganizeError> for Diagnostic {
    fn from(err: &OrganizeError) -> Self {
        let (repository, path) = match err {
            OrganizeError::RepositoryUnavailable {
                repository, path, ..
            } => (Some(repository.clone()), Some(path.display().to_string())),
            OrganizeError::MalformedSourceFile {
                repository, path, ..
            } => (Some(repository.clone()), Some(path.clone())),
            OrganizeError::OutputWriteFailure { path, .. }
            | OrganizeError::NoOutputsWritten { path, .. } => {
                (None, Some(path.display().to_string()))
            }
            OrganizeError::Config(_) => (None, None),
        };

        Diagnostic {
            kind: err.kind(),
            repository,
            path,
            message: err.to_string(),
        }
    }
}

impl From<OrganizeError> for Diagnostic {
    fn from(err: OrganizeError) -> Self {
        Diagnostic::from(&err)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
