//! Runs that hit malformed input, missing checkouts or unusable outputs

use super::helpers::{array_len, Workspace};
use organize_sources::config::{Config, RepositoryConfig};
use organize_sources::error::{DiagnosticKind, OrganizeError};
use organize_sources::models::Category;
use organize_sources::run;
use organize_sources::scan::ScanOptions;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_malformed_file_is_skipped_with_diagnostic() {
    let ws = Workspace::new().unwrap();
    ws.write_source("repo", "good.json", r#"{"type": "anime"}"#)
        .unwrap();
    ws.write_source("repo", "bad.json", "{\"type\": \"anime\",,}")
        .unwrap();

    let report = run(&ws.config(&["repo"])).unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MalformedSourceFile);
    assert_eq!(report.diagnostics[0].path.as_deref(), Some("bad.json"));
    assert_eq!(array_len(&ws.read_output("repo/anime.json").unwrap()), 1);

    let summary = ws.read_output("summary.json").unwrap();
    assert_eq!(summary["grand_total"], 1);
    assert_eq!(summary["statistics"]["files_found"], 2);
    assert_eq!(summary["statistics"]["files_failed"], 1);
    assert_eq!(summary["diagnostics"][0]["kind"], "malformed_source_file");
}

#[test]
fn test_unavailable_repository_does_not_abort() {
    let ws = Workspace::new().unwrap();
    ws.write_source("present", "s/one.json", r#"{"type": "Manga"}"#)
        .unwrap();

    let report = run(&ws.config(&["missing", "present"])).unwrap();

    assert_eq!(report.skipped, vec!["missing"]);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::RepositoryUnavailable);
    assert_eq!(array_len(&ws.read_output("combined/manga.json").unwrap()), 1);

    let summary = ws.read_output("summary.json").unwrap();
    assert!(summary["repositories"].get("missing").is_none());
    assert_eq!(summary["diagnostics"][0]["repository"], "missing");
}

#[test]
fn test_unusable_output_root_fails_the_run() {
    let ws = Workspace::new().unwrap();
    ws.write_source("repo", "a.json", r#"{"type": "anime"}"#)
        .unwrap();
    // Occupy the output location with a regular file
    fs::write(ws.output_dir(), "not a directory").unwrap();

    let result = run(&ws.config(&["repo"]));

    let err = result.unwrap_err();
    assert!(matches!(err, OrganizeError::NoOutputsWritten { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_dot_relative_repository_path_keeps_every_record() {
    // "./.tmpXXXX/ibro": relative, `./`-prefixed and under a hidden directory
    let temp = TempDir::new_in(".").unwrap();
    let repo = temp.path().join("ibro");
    fs::create_dir_all(repo.join("anime")).unwrap();
    fs::write(repo.join("anime/a.json"), r#"{"sourceName": "A", "type": "anime"}"#).unwrap();
    fs::write(repo.join("package.json"), r#"{"name": "tooling"}"#).unwrap();

    let mut config = Config {
        output_dir: temp.path().join("out"),
        repositories: vec![RepositoryConfig {
            name: "ibro".to_string(),
            path: repo,
            url: None,
        }],
        scan: ScanOptions::default(),
    };

    let report = run(&config).unwrap();
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.aggregate.stats.grand_total(), 2);
    let anime = report.aggregate.per_repository["ibro"].get(Category::Anime);
    assert_eq!(anime[0].origin_path, "anime/a.json");

    config.scan.skip_root_files = true;
    let report = run(&config).unwrap();
    let paths: Vec<_> = report
        .aggregate
        .combined
        .iter()
        .flat_map(|(_, records)| records.iter().map(|r| r.origin_path.clone()))
        .collect();
    assert_eq!(paths, vec!["anime/a.json"]);
}
