use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Language identifiers offered when creating a snippet. The catalog seeds
/// pickers and completion only; stored records may carry values outside it
/// and are accepted as-is.
pub const LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "go",
    "rust",
    "java",
    "cpp",
    "html",
    "css",
    "json",
    "markdown",
    "sql",
    "shell",
];

/// Single-level folder labels for organizing snippets. Same catalog rules as
/// `LANGUAGES`: a suggestion list, not a validation set.
pub const FOLDERS: &[&str] = &["Personal", "Work", "Open Source", "Learning", "Archived"];

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_LANGUAGE: &str = "javascript";
pub const DEFAULT_FOLDER: &str = "Personal";

/// A single stored code sample with its metadata.
///
/// Serialized with camelCase keys so the on-disk blob matches the layout
/// earlier versions of the application persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Opaque unique identifier, assigned at creation, never changed.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub folder: String,
    /// Milliseconds since epoch, set once at creation.
    pub created_at: i64,
    /// Milliseconds since epoch, reset on every update.
    pub updated_at: i64,
}

/// Partial snippet record accepted by the save operation. `None` fields keep
/// the existing value on update and fall back to defaults on create.
#[derive(Debug, Clone, Default)]
pub struct SnippetInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder: Option<String>,
}

/// Current wall-clock time in milliseconds since epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl Snippet {
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let snippet = Snippet {
            id: "abc".to_string(),
            title: "Foo".to_string(),
            description: String::new(),
            code: String::new(),
            language: "rust".to_string(),
            tags: vec!["x".to_string()],
            folder: "Work".to_string(),
            created_at: 1000,
            updated_at: 2000,
        };

        let raw = serde_json::to_string(&snippet).unwrap();
        assert!(raw.contains("\"createdAt\":1000"));
        assert!(raw.contains("\"updatedAt\":2000"));
        assert!(!raw.contains("created_at"));
    }

    #[test]
    fn deserializes_legacy_record_without_optional_fields() {
        // Records written by old builds may omit description/code/tags.
        let raw = r#"{
            "id": "1",
            "title": "Hook",
            "language": "javascript",
            "folder": "Personal",
            "createdAt": 5,
            "updatedAt": 5
        }"#;

        let snippet: Snippet = serde_json::from_str(raw).unwrap();
        assert_eq!(snippet.title, "Hook");
        assert_eq!(snippet.description, "");
        assert_eq!(snippet.code, "");
        assert!(snippet.tags.is_empty());
    }
}
