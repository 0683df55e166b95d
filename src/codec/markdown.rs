//! Indented bullet-list codec
//!
//! The file format and plain-text clipboard format of a story map is a
//! dash-bulleted list whose nesting is given by leading whitespace:
//!
//! ```text
//! - Item 1
//!   - Item 2
//! - Item 3
//! ```
//!
//! Nesting is computed from the raw count of leading whitespace characters,
//! not from tab stops. Hand-edited text that mixes widths nests by that
//! count (a line becomes the child of the nearest preceding line with fewer
//! leading characters), which the tests pin down.
//!
//! Ids are regenerated on every parse and `isExpanded` is reset to the
//! configured default, so a serialize/parse round trip preserves shape and
//! text only.

use super::CodecError;
use crate::map::{create_empty_map, create_new_item, Item};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Indentation unit written per nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndentWidth {
    #[default]
    Two,
    Four,
}

impl IndentWidth {
    /// The whitespace written for one level.
    pub fn unit(&self) -> &'static str {
        match self {
            IndentWidth::Two => "  ",
            IndentWidth::Four => "    ",
        }
    }
}

/// What parsing text without any list line yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyListPolicy {
    /// An empty root
    #[default]
    Lenient,
    /// `CodecError::NoListItems`
    Strict,
}

/// Configuration for parsing and serializing bullet lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Indentation unit used by the serializer
    pub indent: IndentWidth,
    /// `isExpanded` given to every parsed item
    pub expand_parsed: bool,
    /// Behaviour when no list line is found
    pub empty_list: EmptyListPolicy,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            indent: IndentWidth::Two,
            expand_parsed: true,
            empty_list: EmptyListPolicy::Lenient,
        }
    }
}

impl MarkdownOptions {
    /// Same options with the strict empty-list policy.
    pub fn strict(self) -> Self {
        Self {
            empty_list: EmptyListPolicy::Strict,
            ..self
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parse
// ─────────────────────────────────────────────────────────────────────────────

static LIST_LINE: OnceLock<Regex> = OnceLock::new();

fn list_line() -> &'static Regex {
    LIST_LINE.get_or_init(|| Regex::new(r"^(\s*)-\s*(.*)$").expect("list line pattern is valid"))
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Continuation text starting with `-` would read back as a list line, so
/// it is written behind a backslash (as is text that already starts with one).
const CONTINUATION_ESCAPE: char = '\\';

fn escape_continuation(line: &str) -> String {
    let trimmed = line.trim_start();
    if trimmed.starts_with('-') || trimmed.starts_with(CONTINUATION_ESCAPE) {
        format!("{}{}", CONTINUATION_ESCAPE, trimmed)
    } else {
        line.to_string()
    }
}

fn unescape_continuation(line: &str) -> &str {
    line.strip_prefix(CONTINUATION_ESCAPE).unwrap_or(line)
}

/// Parse a bullet list into a map rooted at the synthetic root.
///
/// Blank lines are dropped. A non-list line indented deeper than the most
/// recent item's marker continues that item's description on a new line,
/// minus one leading backslash; any other non-list line is ignored as prose.
pub fn parse_markdown(text: &str, options: &MarkdownOptions) -> Result<Item, CodecError> {
    // Open ancestors, innermost last; an entry is attached to its parent
    // once a later line (or the end of input) closes it.
    let mut open: Vec<(usize, Item)> = Vec::new();
    let mut top_level: Vec<Item> = Vec::new();

    fn close(open: &mut Vec<(usize, Item)>, top_level: &mut Vec<Item>) {
        if let Some((_, item)) = open.pop() {
            match open.last_mut() {
                Some((_, parent)) => parent.children.push(item),
                None => top_level.push(item),
            }
        }
    }

    for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
        let Some(caps) = list_line().captures(line) else {
            let level = leading_whitespace(line);
            if let Some((item_level, item)) = open.last_mut() {
                if level > *item_level {
                    item.description.push('\n');
                    item.description.push_str(unescape_continuation(line.trim()));
                }
            }
            continue;
        };

        let level = caps[1].chars().count();
        let description = caps[2].trim();

        while open.last().is_some_and(|(open_level, _)| *open_level >= level) {
            close(&mut open, &mut top_level);
        }
        open.push((level, create_new_item(description, None, options.expand_parsed)));
    }
    while !open.is_empty() {
        close(&mut open, &mut top_level);
    }

    if top_level.is_empty() && options.empty_list == EmptyListPolicy::Strict {
        return Err(CodecError::NoListItems);
    }
    Ok(create_empty_map().with_children(top_level))
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialize
// ─────────────────────────────────────────────────────────────────────────────

/// Render a tree as a bullet list.
///
/// For the synthetic root its own line is omitted and its children start at
/// column zero; any other item is rendered together with its subtree.
pub fn serialize_markdown(item: &Item, indent: IndentWidth) -> String {
    let mut lines = Vec::new();
    if item.is_root() {
        for child in &item.children {
            write_item(child, 0, indent.unit(), &mut lines);
        }
    } else {
        write_item(item, 0, indent.unit(), &mut lines);
    }
    lines.join("\n")
}

fn write_item(item: &Item, depth: usize, unit: &str, lines: &mut Vec<String>) {
    let indent = unit.repeat(depth);
    let mut text = item.description.split('\n');
    lines.push(format!("{}- {}", indent, text.next().unwrap_or_default()));
    // Continuation lines sit under the text, deeper than the marker.
    for continuation in text {
        lines.push(format!("{}  {}", indent, escape_continuation(continuation)));
    }
    for child in &item.children {
        write_item(child, depth + 1, unit, lines);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
