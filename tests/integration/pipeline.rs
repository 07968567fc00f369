//! End-to-end behavior of a successful run

use super::helpers::{array_len, Workspace};
use organize_sources::models::Category;
use organize_sources::run;
use serde_json::{json, Value};

fn seed(ws: &Workspace) {
    ws.write_source(
        "ibro",
        "anime/hianime.json",
        r#"{"sourceName": "HiAnime", "type": "Anime", "baseUrl": "https://hianime.to"}"#,
    )
    .unwrap();
    ws.write_source(
        "ibro",
        "manga/mangadex.json",
        r#"{"sourceName": "MangaDex", "type": "Mangas", "language": "en"}"#,
    )
    .unwrap();
    ws.write_source(
        "50n50",
        "tv/flix.json",
        r#"{"sourceName": "Flix", "type": "TV Series", "quality": "1080p"}"#,
    )
    .unwrap();
    ws.write_source(
        "50n50",
        "anime/animepahe.json",
        r#"{"sourceName": "AnimePahe", "type": "Anime Movie"}"#,
    )
    .unwrap();
    ws.write_source("50n50", "misc/radio.json", r#"{"type": "Music"}"#)
        .unwrap();
}

#[test]
fn test_round_trip_into_repository_and_combined_files() {
    let ws = Workspace::new().unwrap();
    seed(&ws);

    run(&ws.config(&["ibro", "50n50"])).unwrap();

    let expected = json!({"sourceName": "Flix", "type": "TV Series", "quality": "1080p"});
    let repo_file = ws.read_output("50n50/movies_shows.json").unwrap();
    let combined_file = ws.read_output("combined/movies_shows.json").unwrap();
    assert_eq!(repo_file, json!([expected.clone()]));
    assert_eq!(combined_file, json!([expected]));

    // The record appears in no other category file
    for category in Category::ALL {
        if category == Category::MoviesShows {
            continue;
        }
        let other = ws
            .read_output(&format!("combined/{}", category.file_name()))
            .unwrap();
        assert!(!other
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v["sourceName"] == "Flix"));
    }
}

#[test]
fn test_conservation_of_records() {
    let ws = Workspace::new().unwrap();
    seed(&ws);

    let report = run(&ws.config(&["ibro", "50n50"])).unwrap();

    let mut per_repo_total = 0;
    let mut combined_total = 0;
    for category in Category::ALL {
        for repo in ["ibro", "50n50"] {
            per_repo_total += array_len(
                &ws.read_output(&format!("{repo}/{}", category.file_name()))
                    .unwrap(),
            );
        }
        combined_total += array_len(
            &ws.read_output(&format!("combined/{}", category.file_name()))
                .unwrap(),
        );
    }

    assert_eq!(per_repo_total, 5);
    assert_eq!(combined_total, 5);
    assert_eq!(report.aggregate.stats.grand_total(), 5);

    let summary = ws.read_output("summary.json").unwrap();
    assert_eq!(summary["grand_total"], 5);
    assert_eq!(summary["statistics"]["files_processed"], 5);
    assert_eq!(summary["repositories"]["ibro"]["total_sources"], 2);
    assert_eq!(summary["combined"]["anime"]["total_sources"], 2);
    assert_eq!(summary["combined"]["anime"]["repository_count"], 2);
}

#[test]
fn test_combined_order_is_repository_then_source_name() {
    let ws = Workspace::new().unwrap();
    seed(&ws);

    run(&ws.config(&["ibro", "50n50"])).unwrap();

    let anime = ws.read_output("combined/anime.json").unwrap();
    let names: Vec<_> = anime
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["sourceName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["AnimePahe", "HiAnime"]);
}

#[test]
fn test_rerun_produces_identical_category_files() {
    let ws = Workspace::new().unwrap();
    seed(&ws);
    let config = ws.config(&["ibro", "50n50"]);

    run(&config).unwrap();
    let first: Vec<_> = Category::ALL
        .iter()
        .map(|c| ws.output_bytes(&format!("combined/{}", c.file_name())).unwrap())
        .collect();

    run(&config).unwrap();
    let second: Vec<_> = Category::ALL
        .iter()
        .map(|c| ws.output_bytes(&format!("combined/{}", c.file_name())).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_empty_categories_are_written_as_empty_arrays() {
    let ws = Workspace::new().unwrap();
    ws.write_source("solo", "a/one.json", r#"{"sourceName": "One", "type": "anime"}"#)
        .unwrap();

    run(&ws.config(&["solo"])).unwrap();

    assert_eq!(array_len(&ws.read_output("solo/anime.json").unwrap()), 1);
    for name in ["manga", "novel", "movies_shows", "other"] {
        let value = ws.read_output(&format!("solo/{name}.json")).unwrap();
        assert_eq!(value, Value::Array(Vec::new()), "{name}");
    }
}

#[test]
fn test_field_order_is_preserved() {
    let ws = Workspace::new().unwrap();
    ws.write_source(
        "ibro",
        "n/novel.json",
        r#"{"zeta": 1, "type": "Light Novel", "alpha": {"y": 2, "b": 3}}"#,
    )
    .unwrap();

    run(&ws.config(&["ibro"])).unwrap();

    let text = String::from_utf8(ws.output_bytes("ibro/novel.json").unwrap()).unwrap();
    let zeta = text.find("\"zeta\"").unwrap();
    let kind = text.find("\"type\"").unwrap();
    let alpha = text.find("\"alpha\"").unwrap();
    assert!(zeta < kind && kind < alpha);
    assert!(text.find("\"y\"").unwrap() < text.find("\"b\"").unwrap());
}

#[test]
fn test_summary_records_output_digests() {
    let ws = Workspace::new().unwrap();
    seed(&ws);

    run(&ws.config(&["ibro", "50n50"])).unwrap();

    let summary = ws.read_output("summary.json").unwrap();
    let outputs = summary["outputs"].as_object().unwrap();
    assert_eq!(outputs.len(), 15);
    assert!(outputs.contains_key("ibro/anime.json"));
    assert!(outputs.contains_key("combined/other.json"));
    assert_eq!(outputs["combined/anime.json"].as_str().unwrap().len(), 64);
}
