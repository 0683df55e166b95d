//! User settings for storymap
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::codec::{IndentWidth, ListFormat, MarkdownOptions};
use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// File name used when exporting into a directory.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "exported-markdown.md";

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings.
///
/// Persisted as JSON in the user's config directory. Every field has a
/// default through `#[serde(default)]`, so partial files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Codecs
    // ─────────────────────────────────────────────────────────────────────────
    /// Indentation written per level when serializing bullet lists
    pub indent_width: IndentWidth,

    /// Format written by `copy`
    pub clipboard_format: ListFormat,

    /// Whether items created by parsing pasted or imported text start expanded
    pub expand_parsed_items: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────
    /// Maximum number of snapshots kept for undo
    pub history_limit: usize,

    /// Quiet period before an edit is committed to history (milliseconds)
    pub save_debounce_ms: u64,

    /// Override for the directory holding the map history
    pub data_dir: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────
    /// File name used when `export` is given a directory
    pub export_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent_width: IndentWidth::default(),
            clipboard_format: ListFormat::default(),
            expand_parsed_items: true,

            history_limit: DEFAULT_HISTORY_LIMIT,
            save_debounce_ms: 500,
            data_dir: None,

            export_file_name: String::from(DEFAULT_EXPORT_FILE_NAME),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum history length.
    pub const MIN_HISTORY_LIMIT: usize = 1;
    /// Maximum history length.
    pub const MAX_HISTORY_LIMIT: usize = 1000;
    /// Maximum save debounce.
    pub const MAX_SAVE_DEBOUNCE_MS: u64 = 10_000;

    /// Clamp values to valid ranges.
    ///
    /// Useful after loading a file that may have been edited by hand.
    pub fn sanitize(&mut self) {
        self.history_limit = self
            .history_limit
            .clamp(Self::MIN_HISTORY_LIMIT, Self::MAX_HISTORY_LIMIT);

        self.save_debounce_ms = self.save_debounce_ms.min(Self::MAX_SAVE_DEBOUNCE_MS);

        // Only a bare file name is allowed here; directories come from the caller.
        let file_name = PathBuf::from(self.export_file_name.trim())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.export_file_name = match file_name {
            Some(name) if !name.is_empty() => name,
            _ => String::from(DEFAULT_EXPORT_FILE_NAME),
        };

        if self
            .data_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.data_dir = None;
        }
    }

    /// Deserialize and then sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Bullet-list codec options derived from these settings.
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions {
            indent: self.indent_width,
            expand_parsed: self.expand_parsed_items,
            ..MarkdownOptions::default()
        }
    }

    /// Save debounce as a `Duration`.
    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::EmptyListPolicy;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.indent_width, IndentWidth::Two);
        assert_eq!(settings.clipboard_format, ListFormat::Markdown);
        assert!(settings.expand_parsed_items);
        assert_eq!(settings.history_limit, 100);
        assert_eq!(settings.save_debounce_ms, 500);
        assert!(settings.data_dir.is_none());
        assert_eq!(settings.export_file_name, "exported-markdown.md");
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = Settings {
            indent_width: IndentWidth::Four,
            clipboard_format: ListFormat::Html,
            data_dir: Some(PathBuf::from("/tmp/maps")),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_settings_enum_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["indent_width"], "two");
        assert_eq!(json["clipboard_format"], "markdown");
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"indent_width": "four"}"#).unwrap();
        assert_eq!(settings.indent_width, IndentWidth::Four);
        assert_eq!(settings.history_limit, 100);
        assert_eq!(settings.export_file_name, DEFAULT_EXPORT_FILE_NAME);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_history_limit() {
        let mut settings = Settings {
            history_limit: 0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.history_limit, Settings::MIN_HISTORY_LIMIT);

        settings.history_limit = 50_000;
        settings.sanitize();
        assert_eq!(settings.history_limit, Settings::MAX_HISTORY_LIMIT);
    }

    #[test]
    fn test_sanitize_debounce() {
        let mut settings = Settings {
            save_debounce_ms: 60_000,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.save_debounce_ms, Settings::MAX_SAVE_DEBOUNCE_MS);
        assert_eq!(settings.save_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_sanitize_export_file_name() {
        let mut settings = Settings {
            export_file_name: "../../etc/map.md".to_string(),
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.export_file_name, "map.md");

        settings.export_file_name = "   ".to_string();
        settings.sanitize();
        assert_eq!(settings.export_file_name, DEFAULT_EXPORT_FILE_NAME);
    }

    #[test]
    fn test_sanitize_empty_data_dir() {
        let mut settings = Settings {
            data_dir: Some(PathBuf::new()),
            ..Settings::default()
        };
        settings.sanitize();
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings =
            Settings::from_json_sanitized(r#"{"history_limit": 0, "save_debounce_ms": 99999}"#)
                .unwrap();
        assert_eq!(settings.history_limit, 1);
        assert_eq!(settings.save_debounce_ms, 10_000);
        assert!(Settings::from_json_sanitized("{ invalid").is_err());
    }

    #[test]
    fn test_markdown_options() {
        let settings = Settings {
            indent_width: IndentWidth::Four,
            expand_parsed_items: false,
            ..Settings::default()
        };
        let options = settings.markdown_options();
        assert_eq!(options.indent, IndentWidth::Four);
        assert!(!options.expand_parsed);
        assert_eq!(options.empty_list, EmptyListPolicy::Lenient);
    }
}
