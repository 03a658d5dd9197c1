use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Storage key for the snippet collection blob.
pub const SNIPPETS_KEY: &str = "snippets";
/// Storage key for the settings record blob.
pub const SETTINGS_KEY: &str = "settings";

/// Flat key-value persistence over the user's data directory.
///
/// Each key maps to one JSON file under the application data directory. Reads
/// and writes are whole-blob and synchronous; concurrent processes race
/// last-write-wins with no coordination.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// The platform data directory for this application.
    pub fn default_dir() -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .context("Failed to get data directory")?
            .join("codepocket");
        Ok(dir)
    }

    /// Opens storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).context("Failed to create data directory")?;
        Ok(Self { data_dir: dir })
    }

    /// Reads the blob stored under `key`. Returns `None` when the key has
    /// never been written.
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).context("Failed to read storage file")?;
        Ok(Some(contents))
    }

    /// Replaces the blob stored under `key`.
    pub fn write(&self, key: &str, contents: &str) -> Result<()> {
        fs::write(self.key_path(key), contents).context("Failed to write storage file")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}
