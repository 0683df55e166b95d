//! Clipboard copy and paste of item lists
//!
//! Copy writes one subtree as a bullet list or as list markup (with the
//! bullet list as plain-text alternative). Paste reads whatever flavours the
//! clipboard offers and tries the codecs in turn until one yields a list.
//!
//! The system clipboard sits behind `ClipboardBackend` so the copy/paste
//! rules can be exercised without a display server.

use crate::codec::{
    parse_html_list, parse_markdown, serialize_html_list, serialize_markdown, IndentWidth,
    ListFormat, MarkdownOptions,
};
use crate::map::Item;
use arboard::Clipboard;
use log::{debug, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to read clipboard content
    ReadError(String),
    /// Failed to set clipboard content
    WriteError(String),
    /// Neither flavour of the clipboard parses as an item list
    NoItemList,
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::ReadError(msg) => write!(f, "Clipboard read error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
            ClipboardError::NoItemList => {
                write!(f, "Clipboard does not contain a valid item list")
            }
        }
    }
}

impl std::error::Error for ClipboardError {}

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Access to a clipboard offering plain-text and HTML flavours.
///
/// Reads return `None` when the flavour is not on the clipboard.
pub trait ClipboardBackend {
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError>;
    fn read_html(&mut self) -> Result<Option<String>, ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    /// Write markup together with its plain-text alternative.
    fn write_html(&mut self, html: &str, alt_text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard through arboard.
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard =
            Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;
        Ok(Self { clipboard })
    }
}

fn read_flavour(result: Result<String, arboard::Error>) -> Result<Option<String>, ClipboardError> {
    match result {
        Ok(content) => Ok(Some(content)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(ClipboardError::ReadError(e.to_string())),
    }
}

impl ClipboardBackend for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        read_flavour(self.clipboard.get_text())
    }

    fn read_html(&mut self) -> Result<Option<String>, ClipboardError> {
        read_flavour(self.clipboard.get().html())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteError(e.to_string()))
    }

    fn write_html(&mut self, html: &str, alt_text: &str) -> Result<(), ClipboardError> {
        self.clipboard
            .set_html(html, Some(alt_text))
            .map_err(|e| ClipboardError::WriteError(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Copy / Paste
// ─────────────────────────────────────────────────────────────────────────────

/// Copy `item` (and its subtree) in the chosen format.
///
/// The synthetic root copies as its list of children.
pub fn copy_item(
    backend: &mut dyn ClipboardBackend,
    item: &Item,
    format: ListFormat,
    indent: IndentWidth,
) -> Result<(), ClipboardError> {
    let markdown = serialize_markdown(item, indent);
    match format {
        ListFormat::Markdown => backend.write_text(&markdown)?,
        ListFormat::Html => backend.write_html(&serialize_html_list(item), &markdown)?,
    }
    debug!("Copied {} item(s) as {:?}", item.descendant_count() + 1, format);
    Ok(())
}

/// Turn clipboard flavours into a map.
///
/// Order: strict bullet list from the text, list markup from the HTML,
/// list markup from the text.
pub fn parse_clipboard(
    text: Option<&str>,
    html: Option<&str>,
    options: &MarkdownOptions,
) -> Result<Item, ClipboardError> {
    if let Some(text) = text {
        match parse_markdown(text, &options.strict()) {
            Ok(map) => return Ok(map),
            Err(e) => debug!("Clipboard text is not a bullet list: {}", e),
        }
    }

    for (flavour, candidate) in [("html", html), ("text", text)] {
        let Some(candidate) = candidate else { continue };
        match parse_html_list(candidate, options.expand_parsed) {
            Ok(map) => {
                if flavour == "text" {
                    warn!("Clipboard text held list markup rather than a bullet list");
                }
                return Ok(map);
            }
            Err(e) => debug!("Clipboard {} is not list markup: {}", flavour, e),
        }
    }

    Err(ClipboardError::NoItemList)
}

/// Read the clipboard and parse it as an item list.
pub fn paste_items(
    backend: &mut dyn ClipboardBackend,
    options: &MarkdownOptions,
) -> Result<Item, ClipboardError> {
    let text = backend.read_text()?;
    let html = backend.read_html()?;
    parse_clipboard(text.as_deref(), html.as_deref(), options)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
