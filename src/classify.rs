//! Keyword classification of declared source types.

use crate::models::Category;

/// Keyword rules in precedence order; the first rule with a matching keyword wins
const RULES: &[(Category, &[&str])] = &[
    (Category::Anime, &["anime"]),
    (Category::Manga, &["manga"]),
    (Category::Novel, &["novel"]),
    (Category::MoviesShows, &["movie", "show", "tv", "series"]),
];

/// Map a declared `type` value to its category.
///
/// Matching is a case-insensitive substring test. Absent or empty values and
/// values matching no keyword fall through to [`Category::Other`].
pub fn classify(type_value: Option<&str>) -> Category {
    let Some(value) = type_value.filter(|v| !v.is_empty()) else {
        return Category::Other;
    };
    let lowered = value.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Normalize a declared type into a stable tally key.
///
/// Lower-cases and trims, maps `/`, space and `-` to `_`, then collapses
/// runs of `_`. Absent or blank values become `other`.
pub fn normalize_type(type_value: Option<&str>) -> String {
    let trimmed = type_value.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Category::Other.as_str().to_string();
    }

    let mut normalized = String::with_capacity(trimmed.len());
    for c in trimmed.to_lowercase().chars() {
        let c = if matches!(c, '/' | ' ' | '-') { '_' } else { c };
        if c == '_' && normalized.ends_with('_') {
            continue;
        }
        normalized.push(c);
    }
    normalized
}
