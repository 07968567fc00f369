//! Classify JSON source descriptors from several repository checkouts and
//! consolidate them into per-repository and combined category files.

pub mod aggregate;
pub mod classify;
pub mod commands;
pub mod completions;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod scan;

pub use aggregate::{aggregate, Aggregate, Aggregator};
pub use classify::classify;
pub use config::Config;
pub use error::{Diagnostic, OrganizeError};
pub use models::{Category, SourceRecord};
pub use orchestrator::{run, RunReport};
pub use scan::{scan, ScanOptions};
