//! Nested list markup codec
//!
//! Rich clipboard content from browsers and office suites arrives as an HTML
//! fragment. Only the list structure matters here: markup is tokenized with
//! a tag pattern, rebuilt into a small element tree with the implicit-close
//! rules list items need, and then walked for `<ul>`/`<ol>` containers.
//!
//! Text is normalized the way a browser displays it: whitespace runs
//! collapse to one space, character entities are decoded, and `<br>`
//! becomes a line break inside the description.

use super::CodecError;
use crate::map::{create_empty_map, create_new_item, Item};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Indentation unit of the serialized markup.
const INDENT: &str = "  ";

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text is never displayed.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template", "title"];

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

static TAG: OnceLock<Regex> = OnceLock::new();
static ENTITY: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG.get_or_init(|| {
        Regex::new(
            r#"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|<(/?)([A-Za-z][A-Za-z0-9:-]*)(?:[^>"']|"[^"]*"|'[^']*')*>"#,
        )
        .expect("tag pattern is valid")
    })
}

fn entity_pattern() -> &'static Regex {
    ENTITY.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]*);")
            .expect("entity pattern is valid")
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Element Tree
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Node {
    Element { name: String, children: Vec<Node> },
    Text(String),
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    name: String,
    children: Vec<Node>,
}

fn is_list(name: &str) -> bool {
    name == "ul" || name == "ol"
}

/// Tokenize `html` and rebuild its element tree, returning the top-level nodes.
fn build_tree(html: &str) -> Vec<Node> {
    // Index 0 is the document itself and is never closed by a tag.
    let mut stack = vec![OpenElement {
        name: String::new(),
        children: Vec::new(),
    }];
    let mut text_start = 0;

    for caps in tag_pattern().captures_iter(html) {
        let Some(tag) = caps.get(0) else { continue };
        push_text(&mut stack, &html[text_start..tag.start()]);
        text_start = tag.end();

        // Comments, doctypes and processing instructions have no name.
        let Some(name) = caps.get(2) else { continue };
        let name = name.as_str().to_ascii_lowercase();
        let is_end_tag = caps.get(1).is_some_and(|slash| !slash.as_str().is_empty());

        if is_end_tag {
            close_element(&mut stack, &name);
        } else {
            open_element(&mut stack, name, tag.as_str().ends_with("/>"));
        }
    }
    push_text(&mut stack, &html[text_start..]);

    while stack.len() > 1 {
        pop_element(&mut stack);
    }
    stack.pop().map(|document| document.children).unwrap_or_default()
}

fn push_text(stack: &mut [OpenElement], raw: &str) {
    if raw.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current.children.push(Node::Text(decode_entities(raw)));
    }
}

fn open_element(stack: &mut Vec<OpenElement>, name: String, self_closing: bool) {
    if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
        if let Some(current) = stack.last_mut() {
            current.children.push(Node::Element {
                name,
                children: Vec::new(),
            });
        }
        return;
    }

    // A new list item ends the previous one in the same list.
    if name == "li" {
        if let Some(index) = find_open_item(stack) {
            close_to(stack, index);
        }
    }

    stack.push(OpenElement {
        name,
        children: Vec::new(),
    });
}

fn close_element(stack: &mut Vec<OpenElement>, name: &str) {
    let index = if name == "li" {
        find_open_item(stack)
    } else {
        stack
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, open)| open.name == name)
            .map(|(index, _)| index)
    };
    // Stray end tags are ignored.
    if let Some(index) = index {
        close_to(stack, index);
    }
}

/// Innermost open `<li>` that is not separated from the top by a list.
fn find_open_item(stack: &[OpenElement]) -> Option<usize> {
    for (index, open) in stack.iter().enumerate().skip(1).rev() {
        if open.name == "li" {
            return Some(index);
        }
        if is_list(&open.name) {
            return None;
        }
    }
    None
}

fn close_to(stack: &mut Vec<OpenElement>, index: usize) {
    while stack.len() > index.max(1) {
        pop_element(stack);
    }
}

fn pop_element(stack: &mut Vec<OpenElement>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(open) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Node::Element {
                name: open.name,
                children: open.children,
            });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────────────────

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "middot" => '\u{00B7}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        _ => return None,
    };
    Some(c)
}

/// Decode character references; unknown names are left as written.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    entity_pattern()
        .replace_all(text, |caps: &Captures| {
            let reference = &caps[1];
            let decoded = if let Some(hex) = reference
                .strip_prefix("#x")
                .or_else(|| reference.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(decimal) = reference.strip_prefix('#') {
                decimal.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(reference)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br>")
}

/// Accumulates the displayed text of one list item.
#[derive(Default)]
struct Description {
    text: String,
}

impl Description {
    fn push_text(&mut self, raw: &str) {
        let words = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if words.is_empty() {
            return;
        }
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push(' ');
        }
        self.text.push_str(&words);
    }

    fn push_break(&mut self) {
        let kept = self.text.trim_end_matches(' ').len();
        self.text.truncate(kept);
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text.trim().to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parse
// ─────────────────────────────────────────────────────────────────────────────

/// Parse list markup into a map rooted at the synthetic root.
///
/// Every outermost `<ul>`/`<ol>` in the fragment contributes its items, in
/// document order. Markup without any list is an error; an empty list is an
/// empty map.
pub fn parse_html_list(html: &str, expand_parsed: bool) -> Result<Item, CodecError> {
    let document = build_tree(html);

    let mut lists = Vec::new();
    collect_outermost_lists(&document, &mut lists);
    if lists.is_empty() {
        return Err(CodecError::NoListFound);
    }

    let children = lists
        .into_iter()
        .flat_map(|list| list_items(list, expand_parsed))
        .collect();
    Ok(create_empty_map().with_children(children))
}

fn collect_outermost_lists<'a>(nodes: &'a [Node], lists: &mut Vec<&'a [Node]>) {
    for node in nodes {
        if let Node::Element { name, children } = node {
            if is_list(name) {
                lists.push(children);
            } else {
                collect_outermost_lists(children, lists);
            }
        }
    }
}

/// Items of one list; anything other than `<li>` directly inside is ignored.
fn list_items(list: &[Node], expand_parsed: bool) -> Vec<Item> {
    list.iter()
        .filter_map(|node| match node {
            Node::Element { name, children } if name == "li" => {
                Some(list_item(children, expand_parsed))
            }
            _ => None,
        })
        .collect()
}

fn list_item(content: &[Node], expand_parsed: bool) -> Item {
    let mut description = Description::default();
    let mut children = Vec::new();
    collect_item_content(content, expand_parsed, &mut description, &mut children);
    create_new_item(description.finish(), None, expand_parsed).with_children(children)
}

fn collect_item_content(
    nodes: &[Node],
    expand_parsed: bool,
    description: &mut Description,
    children: &mut Vec<Item>,
) {
    for node in nodes {
        match node {
            Node::Text(text) => description.push_text(text),
            Node::Element { name, children: inner } if is_list(name) => {
                children.extend(list_items(inner, expand_parsed));
            }
            Node::Element { name, .. } if name == "br" => description.push_break(),
            Node::Element { name, .. } if HIDDEN_ELEMENTS.contains(&name.as_str()) => {}
            Node::Element { children: inner, .. } => {
                collect_item_content(inner, expand_parsed, description, children);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialize
// ─────────────────────────────────────────────────────────────────────────────

/// Render a tree as two-space indented list markup.
///
/// For the synthetic root the outer `<ul>` holds its children; any other
/// item is wrapped in a one-item list.
pub fn serialize_html_list(item: &Item) -> String {
    let mut lines = Vec::new();
    if item.is_root() {
        write_list(&item.children, 0, &mut lines);
    } else {
        write_list(std::slice::from_ref(item), 0, &mut lines);
    }
    lines.join("\n")
}

fn write_list(items: &[Item], depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    if items.is_empty() {
        lines.push(format!("{}<ul></ul>", indent));
        return;
    }
    lines.push(format!("{}<ul>", indent));
    for item in items {
        write_list_item(item, depth + 1, lines);
    }
    lines.push(format!("{}</ul>", indent));
}

fn write_list_item(item: &Item, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    let text = escape_text(&item.description);
    if item.children.is_empty() {
        lines.push(format!("{}<li>{}</li>", indent, text));
        return;
    }
    lines.push(format!("{}<li>{}", indent, text));
    write_list(&item.children, depth + 1, lines);
    lines.push(format!("{}</li>", indent));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Shape(String, Vec<Shape>);

    fn shape(item: &Item) -> Vec<Shape> {
        item.children
            .iter()
            .map(|c| Shape(c.description.clone(), shape(c)))
            .collect()
    }

    fn s(text: &str, children: Vec<Shape>) -> Shape {
        Shape(text.to_string(), children)
    }

    fn parse(html: &str) -> Item {
        parse_html_list(html, true).unwrap()
    }

    fn leaf(id: &str, text: &str) -> Item {
        Item::new(id, text, false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Parse
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_simple_list() {
        let map = parse("<ul><li>Item 1</li><li>Item 2</li></ul>");
        assert!(map.is_root());
        assert_eq!(shape(&map), vec![s("Item 1", vec![]), s("Item 2", vec![])]);
        assert!(map.children.iter().all(|c| c.is_expanded));
        assert_ne!(map.children[0].id, map.children[1].id);
    }

    #[test]
    fn test_parse_nested_list() {
        let html = "
          <ul>
            <li>Item 1</li>
            <li>Item 2
              <ul>
                <li>Item 2.1</li>
                <li>Item 2.2</li>
              </ul>
            </li>
            <li>Item 3</li>
          </ul>
        ";
        assert_eq!(
            shape(&parse(html)),
            vec![
                s("Item 1", vec![]),
                s("Item 2", vec![s("Item 2.1", vec![]), s("Item 2.2", vec![])]),
                s("Item 3", vec![]),
            ]
        );
    }

    #[test]
    fn test_parse_without_list_is_error() {
        assert_eq!(
            parse_html_list("<p>No list here</p>", true),
            Err(CodecError::NoListFound)
        );
        assert_eq!(parse_html_list("", true), Err(CodecError::NoListFound));
        assert_eq!(
            parse_html_list("- looks like markdown", true),
            Err(CodecError::NoListFound)
        );
    }

    #[test]
    fn test_parse_empty_list_is_empty_map() {
        let map = parse("<ul></ul>");
        assert!(map.is_root());
        assert!(map.children.is_empty());
    }

    #[test]
    fn test_parse_ignores_non_item_children() {
        let map = parse("<ul><li>Item 1</li><p>Not an item</p>loose text<li>Item 2</li></ul>");
        assert_eq!(shape(&map), vec![s("Item 1", vec![]), s("Item 2", vec![])]);
    }

    #[test]
    fn test_parse_concatenates_top_level_lists() {
        let map = parse("<ul><li>A</li></ul><p>between</p><ol><li>B</li></ol>");
        assert_eq!(shape(&map), vec![s("A", vec![]), s("B", vec![])]);
    }

    #[test]
    fn test_parse_inline_markup_joins_text() {
        let map = parse("<ul><li>Text <strong>bold</strong> more</li></ul>");
        assert_eq!(map.children[0].description, "Text bold more");
    }

    #[test]
    fn test_parse_finds_lists_inside_wrappers() {
        let html = r#"<meta charset="utf-8"><b style="font-weight:normal;" id="docs-internal-guid-1"><ul style="margin-top:0"><li dir="ltr"><p dir="ltr"><span style="font-size:11pt">One</span></p></li><li dir="ltr"><p dir="ltr"><span>Two</span></p></li></ul></b>"#;
        assert_eq!(shape(&parse(html)), vec![s("One", vec![]), s("Two", vec![])]);
    }

    #[test]
    fn test_parse_decodes_entities_and_breaks() {
        let map = parse("<ul><li>Tom &amp; Jerry &lt;3 &#65;&#x42; &unknown;</li><li>first<br>second<br/>third</li></ul>");
        assert_eq!(map.children[0].description, "Tom & Jerry <3 AB &unknown;");
        assert_eq!(map.children[1].description, "first\nsecond\nthird");
    }

    #[test]
    fn test_parse_implicitly_closed_items() {
        let map = parse("<ul><li>One<li>Two<ul><li>Two.1</ul><li>Three</ul>");
        assert_eq!(
            shape(&map),
            vec![
                s("One", vec![]),
                s("Two", vec![s("Two.1", vec![])]),
                s("Three", vec![]),
            ]
        );
    }

    #[test]
    fn test_parse_merges_several_nested_lists() {
        let map = parse("<ul><li>Parent<ul><li>a</li></ul>tail<ol><li>b</li></ol></li></ul>");
        assert_eq!(
            shape(&map),
            vec![s("Parent tail", vec![s("a", vec![]), s("b", vec![])])]
        );
    }

    #[test]
    fn test_parse_tolerates_odd_markup() {
        let html = r#"<!-- copied --><UL><LI title="a>b">Upper</LI><li>Script<script>var x = 1;</script></li></UL>"#;
        assert_eq!(shape(&parse(html)), vec![s("Upper", vec![]), s("Script", vec![])]);
    }

    #[test]
    fn test_parse_expansion_flag() {
        let map = parse_html_list("<ul><li>A</li></ul>", false).unwrap();
        assert!(!map.children[0].is_expanded);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Serialize
    // ─────────────────────────────────────────────────────────────────────────

    fn sample_map() -> Item {
        create_empty_map().with_children(vec![
            leaf("1", "Item 1"),
            leaf("2", "Item 2").with_children(vec![
                leaf("2.1", "Item 2.1").with_children(vec![leaf("2.1.1", "Item 2.1.1")]),
                leaf("2.2", "Item 2.2"),
            ]),
            leaf("3", "Item 3"),
        ])
    }

    #[test]
    fn test_serialize_pretty_markup() {
        let expected = "<ul>
  <li>Item 1</li>
  <li>Item 2
    <ul>
      <li>Item 2.1
        <ul>
          <li>Item 2.1.1</li>
        </ul>
      </li>
      <li>Item 2.2</li>
    </ul>
  </li>
  <li>Item 3</li>
</ul>";
        assert_eq!(serialize_html_list(&sample_map()), expected);
    }

    #[test]
    fn test_serialize_empty_root() {
        assert_eq!(serialize_html_list(&create_empty_map()), "<ul></ul>");
    }

    #[test]
    fn test_serialize_non_root_wraps_item() {
        let item = leaf("x", "Solo");
        assert_eq!(serialize_html_list(&item), "<ul>\n  <li>Solo</li>\n</ul>");
    }

    #[test]
    fn test_serialize_escapes_text() {
        let map = create_empty_map().with_children(vec![leaf("x", "a < b && c > d\nnext")]);
        assert_eq!(
            serialize_html_list(&map),
            "<ul>\n  <li>a &lt; b &amp;&amp; c &gt; d<br>next</li>\n</ul>"
        );
    }

    #[test]
    fn test_round_trip_keeps_shape_and_text() {
        let original = sample_map();
        let parsed = parse(&serialize_html_list(&original));
        assert_eq!(shape(&parsed), shape(&original));

        let tricky = create_empty_map().with_children(vec![leaf("x", "<tag> & \"quotes\"\nline two")]);
        let parsed = parse(&serialize_html_list(&tricky));
        assert_eq!(shape(&parsed), shape(&tricky));
    }
}
