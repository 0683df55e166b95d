//! Editing session state for storymap
//!
//! `MapSession` owns the in-memory tree the user is editing, applies one
//! user intent at a time against it, and routes the results into the
//! history store through a save scheduler. Between an edit and its save the
//! in-memory tree is the provisional truth; undo, redo, reset and the
//! strongly consistent reads flush the pending save first so they always
//! act on the latest edit.

use crate::codec::MarkdownOptions;
use crate::dragdrop::{apply_drop, decode_payload, resolve_drop, DropPlacement};
use crate::error::{Error, Result};
use crate::export::{import_markdown_file, paste_items, ClipboardBackend};
use crate::history::{HistoryStatus, KeyValueStore, MapRepository, SaveScheduler};
use crate::map::{
    add_new_item, check_invariants, create_empty_map, create_new_item, delete_item,
    find_child_by_id, move_item, replace_children, set_expanded, toggle_expanded, update_item,
    Item, ItemPatch, ROOT_ID,
};
use log::{debug, info};
use std::path::Path;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Edit Intents
// ─────────────────────────────────────────────────────────────────────────────

/// One user-level edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditIntent {
    /// New item under `parent_id`, appended unless `index` is given
    Add {
        parent_id: String,
        description: String,
        index: Option<usize>,
    },
    /// Replace an item's text; blank text deletes the item
    SetDescription { id: String, description: String },
    Delete { id: String },
    Move {
        id: String,
        parent_id: String,
        index: usize,
    },
    SetExpanded { id: String, expanded: bool },
    ToggleExpanded { id: String },
    /// A dragged card payload dropped relative to `target_id`
    Drop {
        payload: String,
        target_id: String,
        placement: DropPlacement,
    },
    /// Replace every top-level item (paste and import)
    ReplaceChildren { children: Vec<Item> },
}

/// Compute the tree an intent produces, `None` when nothing changes.
///
/// Rejected input (a bad drop payload, an edit aimed at the root) is an
/// error and leaves `tree` untouched.
pub fn resolve_intent(tree: &Item, intent: EditIntent) -> Result<Option<Item>> {
    let updated = match intent {
        EditIntent::Add {
            parent_id,
            description,
            index,
        } => {
            if description.trim().is_empty() {
                debug!("Ignoring add with empty description");
                return Ok(None);
            }
            add_new_item(&parent_id, tree, create_new_item(description, None, false), index)
        }
        EditIntent::SetDescription { id, description } => {
            if id == ROOT_ID {
                return Err(Error::RootProtected { operation: "edit" });
            }
            let Some(current) = find_child_by_id(tree, &id) else {
                return Ok(None);
            };
            if current.description == description {
                return Ok(None);
            }
            if description.trim().is_empty() {
                debug!("Blank description, deleting '{}'", id);
                delete_item(&id, tree)
            } else {
                update_item(tree, ItemPatch::new(id).description(description))
            }
        }
        EditIntent::Delete { id } => {
            if id == ROOT_ID {
                return Err(Error::RootProtected {
                    operation: "delete",
                });
            }
            delete_item(&id, tree)
        }
        EditIntent::Move {
            id,
            parent_id,
            index,
        } => {
            if id == ROOT_ID {
                return Err(Error::RootProtected { operation: "move" });
            }
            move_item(&id, &parent_id, index, tree)
        }
        EditIntent::SetExpanded { id, expanded } => set_expanded(tree, &id, expanded),
        EditIntent::ToggleExpanded { id } => toggle_expanded(tree, &id),
        EditIntent::Drop {
            payload,
            target_id,
            placement,
        } => {
            let dropped = decode_payload(&payload)?;
            if dropped.id == ROOT_ID {
                return Err(Error::RootProtected { operation: "move" });
            }
            match resolve_drop(tree, &dropped, &target_id, placement) {
                Some(action) => apply_drop(tree, action),
                None => return Ok(None),
            }
        }
        EditIntent::ReplaceChildren { children } => {
            let updated = replace_children(tree, children);
            check_invariants(&updated)?;
            updated
        }
    };

    Ok((updated != *tree).then_some(updated))
}

// ─────────────────────────────────────────────────────────────────────────────
// Map Session
// ─────────────────────────────────────────────────────────────────────────────

/// The tree being edited plus the plumbing that persists it.
pub struct MapSession<S: KeyValueStore> {
    repository: MapRepository<S>,
    scheduler: SaveScheduler,
    tree: Item,
    /// Incremented whenever the tree is replaced from history
    version: u64,
}

impl<S: KeyValueStore> MapSession<S> {
    /// Open a session on the repository's current snapshot.
    pub fn open(repository: MapRepository<S>, save_delay: Duration) -> Result<Self> {
        let tree = repository.get()?;
        debug!("Opened session with {} item(s)", tree.descendant_count());
        Ok(Self {
            repository,
            scheduler: SaveScheduler::new(save_delay),
            tree,
            version: 0,
        })
    }

    /// The in-memory tree, including edits not yet saved.
    pub fn tree(&self) -> &Item {
        &self.tree
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if an edit is waiting for its save.
    pub fn has_pending_save(&self) -> bool {
        self.scheduler.is_pending()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply an intent now. Returns `true` if the tree changed.
    pub fn apply(&mut self, intent: EditIntent) -> Result<bool> {
        self.apply_at(intent, Instant::now())
    }

    /// Apply an intent as of `now`, scheduling the resulting save.
    pub fn apply_at(&mut self, intent: EditIntent, now: Instant) -> Result<bool> {
        let Some(updated) = resolve_intent(&self.tree, intent)? else {
            return Ok(false);
        };
        self.tree = updated;
        self.scheduler.schedule(self.tree.clone(), now);
        Ok(true)
    }

    /// Replace the map with the item list on the clipboard.
    pub fn paste(
        &mut self,
        backend: &mut dyn ClipboardBackend,
        options: &MarkdownOptions,
    ) -> Result<bool> {
        let pasted = paste_items(backend, options)?;
        info!("Pasted {} item(s)", pasted.descendant_count());
        self.apply(EditIntent::ReplaceChildren {
            children: pasted.children,
        })
    }

    /// Replace the map with the items of a bullet-list file.
    pub fn import_file(&mut self, path: &Path, options: &MarkdownOptions) -> Result<bool> {
        let imported = import_markdown_file(path, options)?;
        self.apply(EditIntent::ReplaceChildren {
            children: imported.children,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the pending tree if its quiet period is over.
    pub fn tick(&mut self) -> Result<bool> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Result<bool> {
        match self.scheduler.due(now).cloned() {
            Some(tree) => self.save_pending(tree),
            None => Ok(false),
        }
    }

    /// Save the pending tree immediately. Returns `true` if one was pending.
    pub fn flush(&mut self) -> Result<bool> {
        match self.scheduler.peek().cloned() {
            Some(tree) => {
                debug!("Flushing pending save");
                self.save_pending(tree)
            }
            None => Ok(false),
        }
    }

    /// The tree stays pending when the save fails.
    fn save_pending(&mut self, tree: Item) -> Result<bool> {
        self.repository.save(tree)?;
        self.scheduler.complete();
        Ok(true)
    }

    /// The latest committed snapshot, after saving any pending edit.
    pub fn committed_tree(&mut self) -> Result<Item> {
        self.flush()?;
        self.repository.get()
    }

    /// History position, after saving any pending edit.
    pub fn status(&mut self) -> Result<HistoryStatus> {
        self.flush()?;
        self.repository.status()
    }

    /// Step back one snapshot. Returns `false` at the oldest.
    pub fn undo(&mut self) -> Result<bool> {
        self.flush()?;
        let moved = self.repository.undo()?;
        if moved {
            self.reload()?;
            info!("Undo");
        }
        Ok(moved)
    }

    /// Step forward one snapshot. Returns `false` at the newest.
    pub fn redo(&mut self) -> Result<bool> {
        self.flush()?;
        let moved = self.repository.redo()?;
        if moved {
            self.reload()?;
            info!("Redo");
        }
        Ok(moved)
    }

    /// Delete the whole history and start over with an empty map.
    pub fn reset(&mut self) -> Result<()> {
        self.flush()?;
        self.repository.delete()?;
        self.tree = create_empty_map();
        self.version = self.version.wrapping_add(1);
        info!("Map reset");
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        self.tree = self.repository.get()?;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
