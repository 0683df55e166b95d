//! Sibling grouping for the board view.
//!
//! A board lays an item's children out left to right. Children that are
//! expanded and actually have children get a column of their own; every
//! other run of consecutive siblings is packed into a shared column.

use super::model::Item;

/// How a run of siblings is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Consecutive leaves and collapsed parents
    Childless,
    /// One expanded child with children of its own
    Parent,
}

/// A run of siblings `[start, next_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemGroup {
    pub kind: GroupKind,
    pub start: usize,
    /// Start of the next group, or the child count for the last group
    pub next_start: usize,
}

impl ItemGroup {
    pub fn len(&self) -> usize {
        self.next_start - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `item`'s children into layout groups.
pub fn group_children(item: &Item) -> Vec<ItemGroup> {
    let mut groups = Vec::new();
    let mut childless_start: Option<usize> = None;

    for (index, child) in item.children.iter().enumerate() {
        if child.has_children() && child.is_expanded {
            if let Some(start) = childless_start.take() {
                groups.push(ItemGroup {
                    kind: GroupKind::Childless,
                    start,
                    next_start: index,
                });
            }
            groups.push(ItemGroup {
                kind: GroupKind::Parent,
                start: index,
                next_start: index + 1,
            });
        } else if childless_start.is_none() {
            childless_start = Some(index);
        }
    }

    if let Some(start) = childless_start {
        groups.push(ItemGroup {
            kind: GroupKind::Childless,
            start,
            next_start: item.children.len(),
        });
    }

    groups
}
