//! Persisted map history
//!
//! # Architecture
//!
//! - `store.rs` - key-value storage collaborator (file and in-memory)
//! - `repository.rs` - history envelope transitions: get, save, undo, redo, delete
//! - `debounce.rs` - coalescing of rapid edits into single saves

mod debounce;
mod repository;
mod store;

pub use debounce::{SaveScheduler, DEFAULT_SAVE_DELAY};
pub use repository::{HistoryStatus, MapRepository, DEFAULT_HISTORY_LIMIT, MAP_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
