//! Pure edit operations over item trees
//!
//! Every operation takes the tree by reference and returns a new tree; the
//! input is never modified. Operations that address a node by id act on the
//! first match in depth-first, parent-before-children, sibling order (the
//! order [`find_child_by_id`] searches), so behaviour stays deterministic even
//! if ids were ever duplicated.
//!
//! An id that is not in the tree is a silent no-op: the result equals the
//! input. Stale UI state (a drop onto a card deleted a moment ago) must not
//! turn into an error here; malformed input is rejected at the boundary
//! instead (see `validate`).

use super::model::Item;

// ─────────────────────────────────────────────────────────────────────────────
// Patch
// ─────────────────────────────────────────────────────────────────────────────

/// A partial item: the target id plus any subset of fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub id: String,
    pub description: Option<String>,
    pub is_expanded: Option<bool>,
    pub children: Option<Vec<Item>>,
}

impl ItemPatch {
    /// A patch that changes nothing yet.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn expanded(mut self, is_expanded: bool) -> Self {
        self.is_expanded = Some(is_expanded);
        self
    }

    pub fn children(mut self, children: Vec<Item>) -> Self {
        self.children = Some(children);
        self
    }

    fn merge_into(self, item: &mut Item) {
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(is_expanded) = self.is_expanded {
            item.is_expanded = is_expanded;
        }
        if let Some(children) = self.children {
            item.children = children;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────────────────────────────────────

/// Find the first node with `id`, including the tree's own root.
pub fn find_child_by_id<'a>(tree: &'a Item, id: &str) -> Option<&'a Item> {
    tree.find(id)
}

/// Find the direct parent of the first node with `id`.
///
/// Returns `None` when `id` is the tree's own root or is absent.
pub fn find_parent_by_child_id<'a>(tree: &'a Item, id: &str) -> Option<&'a Item> {
    locate(tree, id).map(|(parent, _)| parent)
}

/// Parent and sibling index of the first node with `id`.
pub fn locate<'a>(tree: &'a Item, id: &str) -> Option<(&'a Item, usize)> {
    if let Some(index) = tree.children.iter().position(|child| child.id == id) {
        return Some((tree, index));
    }
    tree.children.iter().find_map(|child| locate(child, id))
}

/// Sibling-index path from `tree` down to the first node with `id`.
///
/// An empty path addresses `tree` itself.
fn path_to(tree: &Item, id: &str) -> Option<Vec<usize>> {
    fn walk(node: &Item, id: &str, path: &mut Vec<usize>) -> bool {
        if node.id == id {
            return true;
        }
        for (index, child) in node.children.iter().enumerate() {
            path.push(index);
            if walk(child, id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    walk(tree, id, &mut path).then_some(path)
}

fn node_at_mut<'a>(tree: &'a mut Item, path: &[usize]) -> &'a mut Item {
    path.iter().fold(tree, |node, &index| &mut node.children[index])
}

// ─────────────────────────────────────────────────────────────────────────────
// Edits
// ─────────────────────────────────────────────────────────────────────────────

/// Merge `patch` into the node whose id matches `patch.id`.
pub fn update_item(tree: &Item, patch: ItemPatch) -> Item {
    let Some(path) = path_to(tree, &patch.id) else {
        return tree.clone();
    };
    let mut updated = tree.clone();
    patch.merge_into(node_at_mut(&mut updated, &path));
    updated
}

/// Insert `new_item` under `parent_id` at `at_index`, appending by default.
///
/// Indices past the end clamp to an append.
pub fn add_new_item(parent_id: &str, tree: &Item, new_item: Item, at_index: Option<usize>) -> Item {
    let Some(path) = path_to(tree, parent_id) else {
        return tree.clone();
    };
    let mut updated = tree.clone();
    let parent = node_at_mut(&mut updated, &path);
    let index = at_index
        .unwrap_or(parent.children.len())
        .min(parent.children.len());
    parent.children.insert(index, new_item);
    updated
}

/// Remove the node with `item_id` together with its subtree.
///
/// The tree's own root is never removed.
pub fn delete_item(item_id: &str, tree: &Item) -> Item {
    let Some(path) = path_to(tree, item_id) else {
        return tree.clone();
    };
    let Some((&index, parent_path)) = path.split_last() else {
        return tree.clone();
    };
    let mut updated = tree.clone();
    node_at_mut(&mut updated, parent_path).children.remove(index);
    updated
}

/// Relocate the subtree rooted at `moved_item_id` under `target_parent_id`.
///
/// All-or-nothing: if the moved node is absent, is the root, or the target
/// parent cannot be found once the moved subtree has been detached (which
/// includes targets inside the moved subtree), the input is returned as is.
/// The target index is interpreted against the post-detach children, so
/// moving a node to its current position is a no-op.
pub fn move_item(
    moved_item_id: &str,
    target_parent_id: &str,
    target_sibling_index: usize,
    tree: &Item,
) -> Item {
    if tree.id == moved_item_id {
        return tree.clone();
    }
    let Some(moved) = find_child_by_id(tree, moved_item_id).cloned() else {
        return tree.clone();
    };

    let detached = delete_item(moved_item_id, tree);
    let Some(path) = path_to(&detached, target_parent_id) else {
        return tree.clone();
    };

    let mut updated = detached;
    let parent = node_at_mut(&mut updated, &path);
    let index = target_sibling_index.min(parent.children.len());
    parent.children.insert(index, moved);
    updated
}

/// Set whether a node's children are shown.
pub fn set_expanded(tree: &Item, id: &str, is_expanded: bool) -> Item {
    update_item(tree, ItemPatch::new(id).expanded(is_expanded))
}

/// Flip a node's expansion flag.
pub fn toggle_expanded(tree: &Item, id: &str) -> Item {
    match find_child_by_id(tree, id) {
        Some(item) => set_expanded(tree, id, !item.is_expanded),
        None => tree.clone(),
    }
}

/// A copy of `tree` whose children are replaced by `children`.
pub fn replace_children(tree: &Item, children: Vec<Item>) -> Item {
    Item {
        id: tree.id.clone(),
        description: tree.description.clone(),
        is_expanded: tree.is_expanded,
        children,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
