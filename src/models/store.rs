use anyhow::Result;
use uuid::Uuid;

use crate::models::snippet::{
    DEFAULT_FOLDER, DEFAULT_LANGUAGE, DEFAULT_TITLE, Snippet, SnippetInput, now_millis,
};
use crate::models::storage::{SNIPPETS_KEY, Storage};

/// Sole owner of the snippet collection; bridges in-memory state and the
/// persisted blob.
///
/// Constructed once at startup and passed by reference to consumers. All
/// mutation funnels through [`SnippetStore::save`] and
/// [`SnippetStore::delete`]; the collection itself is only handed out as a
/// read-only slice.
#[derive(Debug)]
pub struct SnippetStore {
    storage: Storage,
    snippets: Vec<Snippet>,
}

impl SnippetStore {
    /// Loads the collection from storage.
    ///
    /// An absent, unparsable, or empty blob falls back to the built-in
    /// demonstration snippets so the library is never empty on first run.
    /// Parse failures are swallowed; no error reaches the caller.
    pub fn load(storage: Storage) -> Self {
        let snippets = match storage.read(SNIPPETS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Snippet>>(&raw) {
                Ok(parsed) if !parsed.is_empty() => parsed,
                _ => demo_snippets(),
            },
            _ => demo_snippets(),
        };

        Self { storage, snippets }
    }

    /// The full collection, newest-first for records created here.
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Create-or-update. With a matching `id`, the input's populated fields
    /// overlay the existing record, `updatedAt` advances, and the record
    /// keeps its position. Otherwise a new record is assembled with defaults
    /// for the missing fields and prepended to the collection.
    ///
    /// Returns the id of the saved snippet; the collection is re-persisted
    /// on every successful call.
    pub fn save(&mut self, input: SnippetInput, id: Option<&str>) -> Result<String> {
        let position = id.and_then(|id| self.snippets.iter().position(|s| s.id == id));

        let saved_id = match position {
            Some(index) => {
                let existing = &mut self.snippets[index];
                if let Some(title) = input.title {
                    existing.title = title;
                }
                if let Some(description) = input.description {
                    existing.description = description;
                }
                if let Some(code) = input.code {
                    existing.code = code;
                }
                if let Some(language) = input.language {
                    existing.language = language;
                }
                if let Some(tags) = input.tags {
                    existing.tags = tags;
                }
                if let Some(folder) = input.folder {
                    existing.folder = folder;
                }
                existing.updated_at = now_millis();
                existing.id.clone()
            }
            None => {
                let now = now_millis();
                let snippet = Snippet {
                    id: Uuid::new_v4().to_string(),
                    title: input.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    description: input.description.unwrap_or_default(),
                    code: input.code.unwrap_or_default(),
                    language: input
                        .language
                        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
                    tags: input.tags.unwrap_or_default(),
                    folder: input.folder.unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
                    created_at: now,
                    updated_at: now,
                };
                let id = snippet.id.clone();
                self.snippets.insert(0, snippet);
                id
            }
        };

        self.persist()?;
        Ok(saved_id)
    }

    /// Removes the record with `id`. A missing id is a no-op and returns
    /// false. Confirmation happens at the call site before this runs.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.snippets.len();
        self.snippets.retain(|s| s.id != id);
        if self.snippets.len() == before {
            return Ok(false);
        }

        self.persist()?;
        Ok(true)
    }

    /// Serializes the whole collection under the snippets key. An empty
    /// collection is never written; the demo fallback would otherwise be
    /// clobbered by a stray empty state during startup.
    fn persist(&self) -> Result<()> {
        if self.snippets.is_empty() {
            return Ok(());
        }

        let raw = serde_json::to_string_pretty(&self.snippets)?;
        self.storage.write(SNIPPETS_KEY, &raw)
    }
}

/// The three snippets seeded into an empty library.
fn demo_snippets() -> Vec<Snippet> {
    let now = now_millis();

    let hook = Snippet {
        id: "1".to_string(),
        title: "React useLocalStorage Hook".to_string(),
        description: "A custom hook for persisting state to localStorage.".to_string(),
        code: r#"function useLocalStorage(key, initialValue) {
  const [storedValue, setStoredValue] = useState(() => {
    try {
      const item = window.localStorage.getItem(key);
      return item ? JSON.parse(item) : initialValue;
    } catch (error) {
      return initialValue;
    }
  });

  const setValue = value => {
    setStoredValue(value);
    window.localStorage.setItem(key, JSON.stringify(value));
  };

  return [storedValue, setValue];
}"#
        .to_string(),
        language: "javascript".to_string(),
        tags: vec![
            "react".to_string(),
            "hook".to_string(),
            "storage".to_string(),
        ],
        folder: "Personal".to_string(),
        created_at: now,
        updated_at: now,
    };

    let debounce = Snippet {
        id: "2".to_string(),
        title: "TypeScript Debounce Function".to_string(),
        description: "A reusable debounce utility function with TypeScript generics.".to_string(),
        code: r#"function debounce<T extends (...args: any[]) => any>(
  func: T,
  wait: number
): (...args: Parameters<T>) => void {
  let timeout: NodeJS.Timeout | null = null;

  return function executedFunction(...args: Parameters<T>) {
    const later = () => {
      timeout = null;
      func(...args);
    };

    if (timeout) {
      clearTimeout(timeout);
    }
    timeout = setTimeout(later, wait);
  };
}

// Usage
const debouncedSearch = debounce((query: string) => {
  console.log("Searching for:", query);
}, 300);"#
            .to_string(),
        language: "typescript".to_string(),
        tags: vec![
            "typescript".to_string(),
            "utility".to_string(),
            "performance".to_string(),
        ],
        folder: "Work".to_string(),
        created_at: now,
        updated_at: now,
    };

    let context_manager = Snippet {
        id: "3".to_string(),
        title: "Python Context Manager".to_string(),
        description: "A custom context manager for file operations with error handling."
            .to_string(),
        code: r#"from contextlib import contextmanager
from typing import Generator

@contextmanager
def safe_file_operation(filepath: str, mode: str = 'r') -> Generator:
    """Context manager for safe file operations."""
    file = None
    try:
        file = open(filepath, mode)
        yield file
    except FileNotFoundError:
        print(f"File {filepath} not found")
        raise
    except IOError as e:
        print(f"IO error: {e}")
        raise
    finally:
        if file:
            file.close()

# Usage
with safe_file_operation('data.txt', 'r') as f:
    content = f.read()
    print(content)"#
            .to_string(),
        language: "python".to_string(),
        tags: vec![
            "python".to_string(),
            "context-manager".to_string(),
            "file-handling".to_string(),
        ],
        folder: "Learning".to_string(),
        created_at: now,
        updated_at: now,
    };

    vec![hook, debounce, context_manager]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::thread;
    use std::time::Duration;

    fn unique_dir(prefix: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "codepocket-store-{}-{}-{}",
            prefix,
            std::process::id(),
            nanos
        ))
    }

    fn test_storage(prefix: &str) -> Storage {
        Storage::open(unique_dir(prefix)).unwrap()
    }

    #[test]
    fn first_run_seeds_demo_snippets() {
        let store = SnippetStore::load(test_storage("seed"));
        let titles: Vec<_> = store.snippets().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "React useLocalStorage Hook",
                "TypeScript Debounce Function",
                "Python Context Manager"
            ]
        );
    }

    #[test]
    fn malformed_blob_falls_back_to_demo_snippets() {
        let storage = test_storage("malformed");
        storage.write(SNIPPETS_KEY, "{not valid json").unwrap();

        let store = SnippetStore::load(storage);
        assert_eq!(store.snippets().len(), 3);
    }

    #[test]
    fn empty_array_blob_falls_back_to_demo_snippets() {
        let storage = test_storage("empty");
        storage.write(SNIPPETS_KEY, "[]").unwrap();

        let store = SnippetStore::load(storage);
        assert_eq!(store.snippets().len(), 3);
    }

    #[test]
    fn non_empty_blob_loads_verbatim() {
        let storage = test_storage("verbatim");
        storage
            .write(
                SNIPPETS_KEY,
                r#"[{
                    "id": "k1",
                    "title": "Kept",
                    "description": "",
                    "code": "",
                    "language": "weird-lang",
                    "tags": [],
                    "folder": "Nonexistent Folder",
                    "createdAt": 1,
                    "updatedAt": 1
                }]"#,
            )
            .unwrap();

        let store = SnippetStore::load(storage);
        assert_eq!(store.snippets().len(), 1);
        // Out-of-catalog values survive the load untouched.
        assert_eq!(store.snippets()[0].language, "weird-lang");
        assert_eq!(store.snippets()[0].folder, "Nonexistent Folder");
    }

    #[test]
    fn create_applies_defaults_and_prepends() {
        let mut store = SnippetStore::load(test_storage("create"));
        let id = store.save(SnippetInput::default(), None).unwrap();

        assert_eq!(store.snippets().len(), 4);
        let created = &store.snippets()[0];
        assert_eq!(created.id, id);
        assert_eq!(created.title, "Untitled");
        assert_eq!(created.description, "");
        assert_eq!(created.code, "");
        assert_eq!(created.language, "javascript");
        assert_eq!(created.folder, "Personal");
        assert!(created.tags.is_empty());
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn unmatched_id_falls_through_to_create() {
        let mut store = SnippetStore::load(test_storage("unmatched"));
        let input = SnippetInput {
            title: Some("Fresh".to_string()),
            ..Default::default()
        };

        let id = store.save(input, Some("no-such-id")).unwrap();
        assert_ne!(id, "no-such-id");
        assert_eq!(store.snippets().len(), 4);
        assert_eq!(store.snippets()[0].title, "Fresh");
    }

    #[test]
    fn update_overlays_fields_and_keeps_identity() {
        let mut store = SnippetStore::load(test_storage("update"));
        // Target the middle record so position preservation is observable.
        let target = store.snippets()[1].clone();

        // Millisecond timestamps need a beat to strictly advance.
        thread::sleep(Duration::from_millis(2));

        let input = SnippetInput {
            title: Some("Renamed".to_string()),
            tags: Some(vec!["replaced".to_string()]),
            ..Default::default()
        };
        let id = store.save(input, Some(&target.id)).unwrap();

        assert_eq!(id, target.id);
        assert_eq!(store.snippets().len(), 3);

        let updated = &store.snippets()[1];
        assert_eq!(updated.id, target.id);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.tags, vec!["replaced".to_string()]);
        // Unspecified fields keep their prior values.
        assert_eq!(updated.description, target.description);
        assert_eq!(updated.code, target.code);
        assert_eq!(updated.language, target.language);
        assert_eq!(updated.folder, target.folder);
        assert_eq!(updated.created_at, target.created_at);
        assert!(updated.updated_at > target.updated_at);
    }

    #[test]
    fn delete_missing_id_is_a_noop() {
        let mut store = SnippetStore::load(test_storage("delete-missing"));
        assert!(!store.delete("no-such-id").unwrap());
        assert_eq!(store.snippets().len(), 3);
    }

    #[test]
    fn delete_removes_and_persists() {
        let storage = test_storage("delete");
        let mut store = SnippetStore::load(storage.clone());
        let id = store
            .save(
                SnippetInput {
                    title: Some("Doomed".to_string()),
                    ..Default::default()
                },
                None,
            )
            .unwrap();

        assert!(store.delete(&id).unwrap());
        assert!(store.get(&id).is_none());

        let reloaded = SnippetStore::load(storage);
        assert_eq!(reloaded.snippets().len(), 3);
        assert!(reloaded.get(&id).is_none());
    }

    #[test]
    fn empty_collection_is_never_written() {
        let storage = test_storage("never-empty");
        let mut store = SnippetStore::load(storage.clone());

        let ids: Vec<_> = store.snippets().iter().map(|s| s.id.clone()).collect();
        for id in &ids {
            assert!(store.delete(id).unwrap());
        }
        assert!(store.snippets().is_empty());

        // The final delete emptied the collection, so the last persisted
        // blob still holds the one remaining record before it.
        let raw = storage.read(SNIPPETS_KEY).unwrap().unwrap();
        let on_disk: Vec<Snippet> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk[0].id, ids[2]);
    }

    #[test]
    fn save_persists_full_collection() {
        let storage = test_storage("persist");
        let mut store = SnippetStore::load(storage.clone());
        store
            .save(
                SnippetInput {
                    title: Some("Persisted".to_string()),
                    code: Some("let x = 1;".to_string()),
                    ..Default::default()
                },
                None,
            )
            .unwrap();

        let reloaded = SnippetStore::load(storage);
        assert_eq!(reloaded.snippets().len(), 4);
        assert_eq!(reloaded.snippets()[0].title, "Persisted");
        assert_eq!(reloaded.snippets()[0].code, "let x = 1;");
    }
}
