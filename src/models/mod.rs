pub mod settings;
pub mod snippet;
pub mod storage;
pub mod store;

pub use settings::{Settings, SettingsStore};
pub use snippet::{FOLDERS, LANGUAGES, Snippet, SnippetInput};
pub use storage::Storage;
pub use store::SnippetStore;
