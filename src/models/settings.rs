use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::models::storage::{SETTINGS_KEY, Storage};

/// The single flat record of presentation, editor, and organization
/// preferences. One instance exists per machine profile.
///
/// Serialized with camelCase keys, matching the layout earlier versions of
/// the application persisted. Every field carries a serde default so a blob
/// written before a field existed still loads, with the new field taking its
/// default value (forward-compatible merge). Union-typed fields are kept as
/// loose strings; out-of-catalog values are stored as-is and clamping, if
/// any, is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    // Appearance
    pub theme: String,
    pub accent_color: String,
    pub font_size: String,

    // Syntax highlighting
    pub code_theme_light: String,
    pub code_theme_dark: String,
    pub show_line_numbers: bool,
    pub line_number_start: u32,
    pub code_wrapping: String,
    pub highlight_active_line: bool,
    pub font_size_code: u32,

    // Editor preferences
    pub editor_font_family: String,
    pub editor_font_size: u32,
    pub tab_size: u32,
    pub insert_spaces: bool,
    pub word_wrap: String,
    pub auto_save: bool,
    pub auto_save_interval: u32,
    pub format_on_save: bool,
    pub default_language: String,
    pub default_folder: String,
    pub default_template: String,

    // Snippet organization
    pub sort_by: String,
    pub sort_order: String,
    pub snippets_per_page: u32,
    pub show_tags: bool,
    pub show_language: bool,
    pub search_behavior: String,
    pub auto_tag_suggestions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "system".to_string(),
            accent_color: "blue".to_string(),
            font_size: "medium".to_string(),
            code_theme_light: "vs".to_string(),
            code_theme_dark: "vscDarkPlus".to_string(),
            show_line_numbers: true,
            line_number_start: 1,
            code_wrapping: "off".to_string(),
            highlight_active_line: false,
            font_size_code: 12,
            editor_font_family: "monaco".to_string(),
            editor_font_size: 14,
            tab_size: 2,
            insert_spaces: true,
            word_wrap: "off".to_string(),
            auto_save: true,
            auto_save_interval: 30,
            format_on_save: false,
            default_language: "javascript".to_string(),
            default_folder: "Personal".to_string(),
            default_template: String::new(),
            sort_by: "date".to_string(),
            sort_order: "desc".to_string(),
            snippets_per_page: 50,
            show_tags: true,
            show_language: true,
            search_behavior: "fuzzy".to_string(),
            auto_tag_suggestions: true,
        }
    }
}

impl Settings {
    /// Assigns one field by its camelCase wire name from a string value
    /// parsed per the field's type. Unknown keys and unparsable values leave
    /// the record untouched.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "theme" => self.theme = value.to_string(),
            "accentColor" => self.accent_color = value.to_string(),
            "fontSize" => self.font_size = value.to_string(),
            "codeThemeLight" => self.code_theme_light = value.to_string(),
            "codeThemeDark" => self.code_theme_dark = value.to_string(),
            "showLineNumbers" => self.show_line_numbers = parse_bool(key, value)?,
            "lineNumberStart" => self.line_number_start = parse_number(key, value)?,
            "codeWrapping" => self.code_wrapping = value.to_string(),
            "highlightActiveLine" => self.highlight_active_line = parse_bool(key, value)?,
            "fontSizeCode" => self.font_size_code = parse_number(key, value)?,
            "editorFontFamily" => self.editor_font_family = value.to_string(),
            "editorFontSize" => self.editor_font_size = parse_number(key, value)?,
            "tabSize" => self.tab_size = parse_number(key, value)?,
            "insertSpaces" => self.insert_spaces = parse_bool(key, value)?,
            "wordWrap" => self.word_wrap = value.to_string(),
            "autoSave" => self.auto_save = parse_bool(key, value)?,
            "autoSaveInterval" => self.auto_save_interval = parse_number(key, value)?,
            "formatOnSave" => self.format_on_save = parse_bool(key, value)?,
            "defaultLanguage" => self.default_language = value.to_string(),
            "defaultFolder" => self.default_folder = value.to_string(),
            "defaultTemplate" => self.default_template = value.to_string(),
            "sortBy" => self.sort_by = value.to_string(),
            "sortOrder" => self.sort_order = value.to_string(),
            "snippetsPerPage" => self.snippets_per_page = parse_number(key, value)?,
            "showTags" => self.show_tags = parse_bool(key, value)?,
            "showLanguage" => self.show_language = parse_bool(key, value)?,
            "searchBehavior" => self.search_behavior = value.to_string(),
            "autoTagSuggestions" => self.auto_tag_suggestions = parse_bool(key, value)?,
            _ => bail!("Unknown setting: {}", key),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .with_context(|| format!("Setting {} expects true or false, got '{}'", key, value))
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .with_context(|| format!("Setting {} expects a number, got '{}'", key, value))
}

/// Owner of the settings record: synchronous load-and-merge at startup,
/// full-record persistence on every change.
#[derive(Debug)]
pub struct SettingsStore {
    storage: Storage,
    settings: Settings,
}

impl SettingsStore {
    /// Reads the persisted blob. Keys present in the blob win; missing keys
    /// take their defaults. A missing or unparsable blob yields the default
    /// record outright, with no error surfaced.
    pub fn load(storage: Storage) -> Self {
        let settings = match storage.read(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
            _ => Settings::default(),
        };

        Self { storage, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces a single field and re-persists the whole record.
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        self.update_many(&[(key, value)])
    }

    /// Applies a batch of field assignments as one step: either every pair
    /// parses and the record is updated and persisted once, or nothing
    /// changes.
    pub fn update_many(&mut self, pairs: &[(&str, &str)]) -> Result<()> {
        let mut updated = self.settings.clone();
        for (key, value) in pairs {
            updated.set_field(key, value)?;
        }

        self.settings = updated;
        self.persist()
    }

    /// Restores the entire record to defaults and persists it.
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.settings)?;
        self.storage.write(SETTINGS_KEY, &raw)
    }
}
