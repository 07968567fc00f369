use serde_json::{Map, Value};

use super::category::Category;

/// Name reported for descriptors that carry no `sourceName`
pub const UNKNOWN_SOURCE_NAME: &str = "Unknown";

/// One parsed source descriptor file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    /// `sourceName` field, if present and a string
    pub source_name: Option<String>,
    /// `type` field, if present and a string
    pub declared_type: Option<String>,
    pub category: Category,
    /// The parsed object exactly as read
    pub raw: Map<String, Value>,
    pub origin_repository: String,
    /// Path relative to the repository root, forward-slash normalized
    pub origin_path: String,
}

impl SourceRecord {
    /// Name for display and summaries, falling back to [`UNKNOWN_SOURCE_NAME`]
    pub fn display_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or(UNKNOWN_SOURCE_NAME)
    }

    /// Key used to order records inside one repository bucket
    pub fn sort_key(&self) -> (String, &str) {
        (
            self.source_name.as_deref().unwrap_or("").to_lowercase(),
            self.origin_path.as_str(),
        )
    }
}

/// Read an optional string field from a descriptor object
pub fn string_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}
