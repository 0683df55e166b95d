//! Drag-and-drop of item cards
//!
//! A dragged card carries its whole subtree as JSON under a custom media
//! type. The drop side cannot trust that payload (it may come from a stale
//! view or another window), so it is re-validated before use, and the drop
//! is resolved against the current tree into either a move or an insert.

use crate::map::{
    add_new_item, create_new_item, find_child_by_id, locate, move_item, validate_item_json, Item,
    ValidationError,
};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Media type under which a dragged card travels.
pub const DRAG_MEDIA_TYPE: &str = "application/item-card";

// ─────────────────────────────────────────────────────────────────────────────
// Payload
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a dragged subtree.
pub fn encode_payload(item: &Item) -> String {
    // Item has only string, bool and array fields; serialization cannot fail.
    serde_json::to_string(item).unwrap_or_default()
}

/// Parse and validate a dropped payload.
pub fn decode_payload(payload: &str) -> Result<Item, ValidationError> {
    validate_item_json(payload)
}

// ─────────────────────────────────────────────────────────────────────────────
// Drop Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Where a card is dropped relative to the card under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlacement {
    /// Sibling slot in front of the target
    Before,
    /// Sibling slot behind the target
    After,
    /// Last child of the target
    Into,
}

impl fmt::Display for DropPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DropPlacement::Before => "before",
            DropPlacement::After => "after",
            DropPlacement::Into => "into",
        };
        f.write_str(name)
    }
}

impl FromStr for DropPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(DropPlacement::Before),
            "after" => Ok(DropPlacement::After),
            "into" => Ok(DropPlacement::Into),
            other => Err(format!(
                "unknown placement '{}', expected before, after or into",
                other
            )),
        }
    }
}

/// The edit a drop turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// The card already exists in the tree
    Move {
        item_id: String,
        parent_id: String,
        index: usize,
    },
    /// The card is new: insert an empty item that keeps the dragged id
    Add {
        parent_id: String,
        index: usize,
        item: Item,
    },
}

/// Resolve dropping `dropped` at `placement` relative to `target_id`.
///
/// Returns `None` when the drop cannot apply: the target is absent, a
/// sibling slot of the root was requested, or the target lies inside the
/// dragged subtree.
pub fn resolve_drop(
    tree: &Item,
    dropped: &Item,
    target_id: &str,
    placement: DropPlacement,
) -> Option<DropAction> {
    let existing = find_child_by_id(tree, &dropped.id);
    if existing.is_some_and(|moved| moved.contains(target_id)) {
        debug!("Ignoring drop of '{}' onto its own subtree", dropped.id);
        return None;
    }

    let (parent_id, index) = match placement {
        DropPlacement::Into => {
            let target = find_child_by_id(tree, target_id)?;
            (target.id.clone(), target.children.len())
        }
        DropPlacement::Before | DropPlacement::After => {
            let (parent, target_index) = locate(tree, target_id)?;
            let slot = match placement {
                DropPlacement::After => target_index + 1,
                _ => target_index,
            };
            (parent.id.clone(), slot)
        }
    };

    if existing.is_none() {
        return Some(DropAction::Add {
            parent_id,
            index,
            item: create_new_item("", Some(dropped.id.clone()), false),
        });
    }

    // The slot was computed with the card still in place; shift it for
    // the detached list when the card sits earlier under the same parent.
    let index = match locate(tree, &dropped.id) {
        Some((parent, current)) if parent.id == parent_id && current < index => index - 1,
        _ => index,
    };
    Some(DropAction::Move {
        item_id: dropped.id.clone(),
        parent_id,
        index,
    })
}

/// Apply a resolved drop to `tree`.
pub fn apply_drop(tree: &Item, action: DropAction) -> Item {
    match action {
        DropAction::Move {
            item_id,
            parent_id,
            index,
        } => move_item(&item_id, &parent_id, index, tree),
        DropAction::Add {
            parent_id,
            index,
            item,
        } => add_new_item(&parent_id, tree, item, Some(index)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{create_empty_map, ROOT_ID};

    fn leaf(id: &str) -> Item {
        Item::new(id, id.to_uppercase(), false)
    }

    /// root -> a[a1, a2], b, c
    fn board() -> Item {
        create_empty_map().with_children(vec![
            leaf("a").with_children(vec![leaf("a1"), leaf("a2")]),
            leaf("b"),
            leaf("c"),
        ])
    }

    fn ids(item: &Item) -> Vec<&str> {
        item.children.iter().map(|c| c.id.as_str()).collect()
    }

    fn drop_onto(tree: &Item, id: &str, target: &str, placement: DropPlacement) -> Item {
        let dropped = tree.find(id).cloned().unwrap_or_else(|| leaf(id));
        match resolve_drop(tree, &dropped, target, placement) {
            Some(action) => apply_drop(tree, action),
            None => tree.clone(),
        }
    }

    #[test]
    fn test_payload_round_trip() {
        let item = board().children[0].clone();
        let payload = encode_payload(&item);
        assert!(payload.contains("\"isExpanded\""));
        assert_eq!(decode_payload(&payload).unwrap(), item);
    }

    #[test]
    fn test_payload_is_revalidated() {
        assert!(decode_payload("not json").is_err());
        assert!(matches!(
            decode_payload(r#"{"id":"x","description":"y","children":[]}"#),
            Err(ValidationError::MissingField { field: "isExpanded", .. })
        ));
    }

    #[test]
    fn test_placement_parsing() {
        assert_eq!("before".parse::<DropPlacement>(), Ok(DropPlacement::Before));
        assert_eq!("INTO".parse::<DropPlacement>(), Ok(DropPlacement::Into));
        assert!("beside".parse::<DropPlacement>().is_err());
        assert_eq!(DropPlacement::After.to_string(), "after");
    }

    #[test]
    fn test_resolve_slots() {
        let tree = board();
        let dropped = leaf("c");
        assert_eq!(
            resolve_drop(&tree, &dropped, "b", DropPlacement::Before),
            Some(DropAction::Move {
                item_id: "c".to_string(),
                parent_id: ROOT_ID.to_string(),
                index: 1
            })
        );
        assert_eq!(
            resolve_drop(&tree, &dropped, "a", DropPlacement::Into),
            Some(DropAction::Move {
                item_id: "c".to_string(),
                parent_id: "a".to_string(),
                index: 2
            })
        );
    }

    #[test]
    fn test_move_later_sibling_before() {
        let tree = drop_onto(&board(), "c", "a", DropPlacement::Before);
        assert_eq!(ids(&tree), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_earlier_sibling_after() {
        let tree = drop_onto(&board(), "a", "b", DropPlacement::After);
        assert_eq!(ids(&tree), vec!["b", "a", "c"]);

        let tree = drop_onto(&board(), "a", "c", DropPlacement::Before);
        assert_eq!(ids(&tree), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        for (target, placement) in [("b", DropPlacement::Before), ("a", DropPlacement::After)] {
            assert_eq!(drop_onto(&board(), "b", target, placement), board());
        }
    }

    #[test]
    fn test_move_into_other_parent() {
        let tree = drop_onto(&board(), "c", "a", DropPlacement::Into);
        assert_eq!(ids(&tree), vec!["a", "b"]);
        assert_eq!(ids(&tree.children[0]), vec!["a1", "a2", "c"]);

        let tree = drop_onto(&board(), "a2", "b", DropPlacement::After);
        assert_eq!(ids(&tree), vec!["a", "b", "a2", "c"]);
    }

    #[test]
    fn test_unknown_card_inserts_blank_with_same_id() {
        let tree = drop_onto(&board(), "fresh", "a1", DropPlacement::After);
        let a = &tree.children[0];
        assert_eq!(ids(a), vec!["a1", "fresh", "a2"]);
        assert_eq!(a.children[1].description, "");
        assert!(a.children[1].children.is_empty());
    }

    #[test]
    fn test_unknown_card_ignores_payload_subtree() {
        let dropped = leaf("fresh").with_children(vec![leaf("nested")]);
        let action = resolve_drop(&board(), &dropped, "b", DropPlacement::Into).unwrap();
        let tree = apply_drop(&board(), action);
        let inserted = tree.find("fresh").unwrap();
        assert!(inserted.children.is_empty());
        assert!(!tree.contains("nested"));
    }

    #[test]
    fn test_rejected_drops() {
        let tree = board();
        assert!(resolve_drop(&tree, &leaf("c"), "missing", DropPlacement::Into).is_none());
        assert!(resolve_drop(&tree, &leaf("c"), ROOT_ID, DropPlacement::Before).is_none());
        let a = tree.children[0].clone();
        assert!(resolve_drop(&tree, &a, "a1", DropPlacement::Into).is_none());
        assert!(resolve_drop(&tree, &a, "a", DropPlacement::Into).is_none());
    }

    #[test]
    fn test_drop_into_root() {
        let tree = drop_onto(&board(), "a1", ROOT_ID, DropPlacement::Into);
        assert_eq!(ids(&tree), vec!["a", "b", "c", "a1"]);
    }
}
