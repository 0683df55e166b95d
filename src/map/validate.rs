//! Boundary validation for items arriving from outside the process
//!
//! Drag payloads, pasted trees and stored records are untrusted JSON. They are
//! checked here field by field before being turned into `Item` values, so a
//! rejected payload never touches the in-memory tree and the caller learns
//! which node and which rule failed.

use super::model::{Item, ROOT_ID};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Validation Error
// ─────────────────────────────────────────────────────────────────────────────

/// Why a candidate item (or tree) was rejected.
///
/// `path` values use a JSONPath-like form such as `$.children[2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Payload is not JSON at all
    InvalidJson(String),
    /// A node is not a JSON object
    NotAnObject { path: String },
    /// A required field is absent
    MissingField { path: String, field: &'static str },
    /// A field holds the wrong JSON type
    WrongType {
        path: String,
        field: &'static str,
        expected: &'static str,
    },
    /// The id is an empty string
    EmptyId { path: String },
    /// A whole map does not start at the synthetic root
    NotRoot { found: String },
    /// The synthetic root carries text
    RootDescription,
    /// Two nodes share an id
    DuplicateId { id: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidJson(msg) => write!(f, "not valid JSON: {}", msg),
            ValidationError::NotAnObject { path } => write!(f, "{} is not an object", path),
            ValidationError::MissingField { path, field } => {
                write!(f, "{} is missing '{}'", path, field)
            }
            ValidationError::WrongType {
                path,
                field,
                expected,
            } => write!(f, "{}.{} must be {}", path, field, expected),
            ValidationError::EmptyId { path } => write!(f, "{}.id must not be empty", path),
            ValidationError::NotRoot { found } => {
                write!(f, "map root must have id '{}', found '{}'", ROOT_ID, found)
            }
            ValidationError::RootDescription => write!(f, "map root must have no description"),
            ValidationError::DuplicateId { id } => write!(f, "id '{}' appears more than once", id),
        }
    }
}

impl std::error::Error for ValidationError {}

// ─────────────────────────────────────────────────────────────────────────────
// Structural Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a JSON value as an item tree and convert it.
///
/// Checks, recursively: `id` is a non-empty string, `description` is a string,
/// `isExpanded` is a boolean, `children` is an array of valid items.
/// Unknown fields are ignored.
pub fn validate_item(value: &Value) -> Result<Item, ValidationError> {
    validate_at(value, "$".to_string())
}

/// Parse a JSON string and validate it as an item tree.
pub fn validate_item_json(json: &str) -> Result<Item, ValidationError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    validate_item(&value)
}

/// Boolean form of [`validate_item`].
pub fn is_valid_item(value: &Value) -> bool {
    validate_item(value).is_ok()
}

fn validate_at(value: &Value, path: String) -> Result<Item, ValidationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject { path: path.clone() })?;

    let field = |name: &'static str| {
        object.get(name).ok_or_else(|| ValidationError::MissingField {
            path: path.clone(),
            field: name,
        })
    };
    let wrong_type = |name: &'static str, expected: &'static str| ValidationError::WrongType {
        path: path.clone(),
        field: name,
        expected,
    };

    let id = field("id")?
        .as_str()
        .ok_or_else(|| wrong_type("id", "a string"))?;
    if id.is_empty() {
        return Err(ValidationError::EmptyId { path: path.clone() });
    }
    let description = field("description")?
        .as_str()
        .ok_or_else(|| wrong_type("description", "a string"))?;
    let is_expanded = field("isExpanded")?
        .as_bool()
        .ok_or_else(|| wrong_type("isExpanded", "a boolean"))?;
    let raw_children = field("children")?
        .as_array()
        .ok_or_else(|| wrong_type("children", "an array"))?;

    let children = raw_children
        .iter()
        .enumerate()
        .map(|(index, child)| validate_at(child, format!("{}.children[{}]", path, index)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Item {
        id: id.to_string(),
        description: description.to_string(),
        is_expanded,
        children,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Invariants
// ─────────────────────────────────────────────────────────────────────────────

/// Check the whole-map invariants: root id, empty root text, unique ids.
///
/// Reports the first violation in depth-first order.
pub fn check_invariants(map: &Item) -> Result<(), ValidationError> {
    if !map.is_root() {
        return Err(ValidationError::NotRoot {
            found: map.id.clone(),
        });
    }
    if !map.description.is_empty() {
        return Err(ValidationError::RootDescription);
    }

    let mut seen = HashSet::new();
    seen.insert(map.id.as_str());
    check_unique(&map.children, &mut seen)
}

fn check_unique<'a>(items: &'a [Item], seen: &mut HashSet<&'a str>) -> Result<(), ValidationError> {
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: item.id.clone(),
            });
        }
        check_unique(&item.children, seen)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
