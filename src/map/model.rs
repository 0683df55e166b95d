//! Item tree and history envelope types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Id of the synthetic container whose children are the top-level items.
pub const ROOT_ID: &str = "__root";

// ─────────────────────────────────────────────────────────────────────────────
// Item
// ─────────────────────────────────────────────────────────────────────────────

/// A node in the story map.
///
/// Trees are plain values: every edit produces a new tree and leaves its
/// input untouched, so an `Item` is freely cloned into history snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable unique identifier
    pub id: String,
    /// Plain text content, possibly spanning several lines
    pub description: String,
    /// Whether children are shown inline
    pub is_expanded: bool,
    /// Ordered children; order is sibling rank
    pub children: Vec<Item>,
}

impl Item {
    /// Create an item with an explicit id and no children.
    pub fn new(id: impl Into<String>, description: impl Into<String>, is_expanded: bool) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            is_expanded,
            children: Vec::new(),
        }
    }

    /// Builder-style helper to attach children.
    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.children = children;
        self
    }

    /// Check if this is the synthetic root.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Check if this item has any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first, parent-before-children lookup including `self`.
    pub fn find(&self, id: &str) -> Option<&Item> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Check if `id` is this item or one of its descendants.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Number of nodes below this item.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// History Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted history record: snapshots newest-first plus the current pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub map_history: Vec<Item>,
    pub current_map_index: usize,
}

impl MapData {
    /// Envelope holding a single snapshot.
    pub fn with_snapshot(map: Item) -> Self {
        Self {
            map_history: vec![map],
            current_map_index: 0,
        }
    }

    /// The snapshot the pointer currently selects.
    pub fn current(&self) -> Option<&Item> {
        self.map_history.get(self.current_map_index)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a fresh key-safe item id.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The first-run map: an expanded root with nothing under it.
pub fn create_empty_map() -> Item {
    Item::new(ROOT_ID, "", true)
}

/// Create a childless item, generating an id unless one is supplied.
///
/// Callers pre-assign the id when the item must be addressable before the
/// save round trip completes (e.g. to focus it).
pub fn create_new_item(description: impl Into<String>, id: Option<String>, is_expanded: bool) -> Item {
    Item::new(id.unwrap_or_else(generate_id), description, is_expanded)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
