//! Moving maps in and out of the application
//!
//! # Architecture
//!
//! - `clipboard.rs` - copy/paste of item lists through the platform clipboard
//! - `file.rs` - bullet-list file import, bullet-list and markup file export

pub mod clipboard;
pub mod file;

pub use clipboard::{
    copy_item, parse_clipboard, paste_items, ClipboardBackend, ClipboardError, SystemClipboard,
};
pub use file::{export_map_file, export_markdown_file, import_markdown_file, resolve_export_path};
