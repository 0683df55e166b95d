//! Story map tree model
//!
//! This module defines the item tree, its boundary validation, and the pure
//! edit algebra the rest of the application composes edits from.
//!
//! # Architecture
//!
//! - `model.rs` - `Item`, `MapData` and item/map creation
//! - `validate.rs` - deserialize-and-validate for external payloads, tree invariants
//! - `edit.rs` - insert, delete, move, update and lookups
//! - `layout.rs` - sibling grouping for the board view

mod edit;
mod layout;
mod model;
mod validate;

pub use edit::{
    add_new_item, delete_item, find_child_by_id, find_parent_by_child_id, locate, move_item,
    replace_children, set_expanded, toggle_expanded, update_item, ItemPatch,
};
pub use layout::{group_children, GroupKind, ItemGroup};
pub use model::{create_empty_map, create_new_item, generate_id, Item, MapData, ROOT_ID};
pub use validate::{
    check_invariants, is_valid_item, validate_item, validate_item_json, ValidationError,
};
