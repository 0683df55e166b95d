//! Interchange codecs for story maps
//!
//! Two text renditions of an item tree exist outside the process: an
//! indented bullet list (file import/export and plain-text clipboard) and
//! nested list markup (rich clipboard content from browsers and office
//! suites).
//!
//! # Architecture
//!
//! - `markdown.rs` - indented bullet list parse/serialize
//! - `richtext.rs` - `<ul>`/`<li>` markup parse/serialize

mod markdown;
mod richtext;

pub use markdown::{
    parse_markdown, serialize_markdown, EmptyListPolicy, IndentWidth, MarkdownOptions,
};
pub use richtext::{parse_html_list, serialize_html_list};

use crate::map::Item;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Codec Error
// ─────────────────────────────────────────────────────────────────────────────

/// Input that could not be turned into items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Strict bullet-list parse found no list line
    NoListItems,
    /// Markup contains no `<ul>` or `<ol>` element
    NoListFound,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::NoListItems => write!(f, "No list items found in markdown"),
            CodecError::NoListFound => write!(f, "No list found in HTML"),
        }
    }
}

impl std::error::Error for CodecError {}

// ─────────────────────────────────────────────────────────────────────────────
// Format Selector
// ─────────────────────────────────────────────────────────────────────────────

/// Which rendition to produce when copying or exporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    #[default]
    Markdown,
    Html,
}

impl ListFormat {
    /// Render `item` in this format.
    pub fn render(&self, item: &Item, indent: IndentWidth) -> String {
        match self {
            ListFormat::Markdown => serialize_markdown(item, indent),
            ListFormat::Html => serialize_html_list(item),
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ListFormat::Markdown => "md",
            ListFormat::Html => "html",
        }
    }
}
