//! storymap - a story map outliner
//!
//! Nested items edited through an immutable edit algebra, exchanged as
//! bullet lists or list markup, and persisted as an undoable history.
//!
//! # Architecture
//!
//! - `map` - item tree, edit operations, validation and board grouping
//! - `codec` - bullet-list and list-markup conversion
//! - `history` - snapshot history over a key-value store, debounced saves
//! - `state` - editing session tying intents, history and saves together
//! - `dragdrop` - dragged card payloads and drop resolution
//! - `export` - clipboard and file interchange
//! - `config` - settings and their persistence
//! - `cli` - command-line surface

pub mod cli;
pub mod codec;
pub mod config;
pub mod dragdrop;
pub mod error;
pub mod export;
pub mod history;
pub mod map;
pub mod state;

pub use error::{Error, Result};
