//! Command-line surface
//!
//! Each invocation opens the stored map, applies exactly one command through
//! a `MapSession`, flushes the resulting save and exits. Item ids may be
//! abbreviated to any unique prefix, as shown by `show --ids`.

use crate::codec::{IndentWidth, ListFormat};
use crate::config::{get_config_dir, get_data_dir, save_config_to, Settings};
use crate::dragdrop::{encode_payload, DropPlacement};
use crate::error::{Error, Result};
use crate::export::{copy_item, export_map_file, ClipboardBackend, SystemClipboard};
use crate::history::{FileStore, KeyValueStore, MapRepository};
use crate::map::{group_children, GroupKind, Item, ROOT_ID};
use crate::state::{EditIntent, MapSession};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Characters of an id printed by `show --ids`.
const SHORT_ID_LEN: usize = 8;

#[derive(Debug, Parser)]
#[command(
    name = "storymap",
    about = "Story map outliner with markdown interchange and undoable local history",
    version
)]
pub struct Cli {
    /// Directory holding the map history (overrides the configured one)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Html,
}

impl From<FormatArg> for ListFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => ListFormat::Markdown,
            FormatArg::Html => ListFormat::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndentArg {
    Two,
    Four,
}

impl From<IndentArg> for IndentWidth {
    fn from(arg: IndentArg) -> Self {
        match arg {
            IndentArg::Two => IndentWidth::Two,
            IndentArg::Four => IndentWidth::Four,
        }
    }
}

/// Settings changed by `config`; omitted flags keep their value.
#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Spaces per nesting level when writing bullet lists
    #[arg(long, value_enum)]
    pub indent: Option<IndentArg>,
    /// Default clipboard format for `copy`
    #[arg(long, value_enum)]
    pub clipboard_format: Option<FormatArg>,
    /// Whether pasted and imported items start expanded
    #[arg(long)]
    pub expand_parsed: Option<bool>,
    /// Snapshots kept in history
    #[arg(long)]
    pub history_limit: Option<usize>,
    /// Quiet period before an edit is saved
    #[arg(long)]
    pub save_debounce_ms: Option<u64>,
    /// Directory holding the map history
    #[arg(long)]
    pub store_dir: Option<PathBuf>,
    /// File name used when exporting into a directory
    #[arg(long)]
    pub export_file_name: Option<String>,
}

impl ConfigArgs {
    /// Write the given overrides into `settings`. Returns `true` if any was given.
    fn apply_to(self, settings: &mut Settings) -> bool {
        let mut changed = false;
        if let Some(indent) = self.indent {
            settings.indent_width = indent.into();
            changed = true;
        }
        if let Some(format) = self.clipboard_format {
            settings.clipboard_format = format.into();
            changed = true;
        }
        if let Some(expand) = self.expand_parsed {
            settings.expand_parsed_items = expand;
            changed = true;
        }
        if let Some(limit) = self.history_limit {
            settings.history_limit = limit;
            changed = true;
        }
        if let Some(ms) = self.save_debounce_ms {
            settings.save_debounce_ms = ms;
            changed = true;
        }
        if let Some(dir) = self.store_dir {
            settings.data_dir = Some(dir);
            changed = true;
        }
        if let Some(name) = self.export_file_name {
            settings.export_file_name = name;
            changed = true;
        }
        changed
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the map.
    Show {
        /// Lay top-level items out as board columns
        #[arg(long)]
        board: bool,
        /// Prefix every item with its short id
        #[arg(long)]
        ids: bool,
        /// Also print the children of collapsed items
        #[arg(long)]
        all: bool,
    },

    /// Add an item.
    Add {
        description: String,
        /// Parent item id (defaults to the top level)
        #[arg(long)]
        parent: Option<String>,
        /// Position among the parent's children (defaults to the end)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Replace an item's text. Blank text deletes the item.
    Edit { id: String, description: String },

    /// Delete an item and everything under it.
    Delete { id: String },

    /// Move an item before, after or into another item.
    Move {
        id: String,
        placement: DropPlacement,
        target: String,
        /// Exact child position when moving `into`
        #[arg(long)]
        index: Option<usize>,
    },

    /// Show an item's children.
    Expand { id: String },

    /// Hide an item's children.
    Collapse { id: String },

    /// Flip whether an item's children are shown.
    Toggle { id: String },

    /// Step back to the previous snapshot.
    Undo,

    /// Step forward to the next snapshot.
    Redo,

    /// Print the history position.
    History,

    /// Replace the map with the items of a bullet-list file.
    Import { path: PathBuf },

    /// Write the map to a file (or into a directory).
    Export {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Copy the map, or one item's subtree, to the clipboard.
    Copy {
        id: Option<String>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Replace the map with the item list on the clipboard.
    Paste,

    /// Delete the whole history.
    Reset,

    /// Print the settings, saving any that are given.
    Config(ConfigArgs),
}

impl Commands {
    fn needs_clipboard(&self) -> bool {
        matches!(self, Commands::Copy { .. } | Commands::Paste)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

pub fn run_from_env(settings: Settings) -> Result<()> {
    let cli = Cli::parse();
    run(cli, settings)
}

/// Open the configured store and execute one command against it.
pub fn run(cli: Cli, settings: Settings) -> Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => get_data_dir(&settings)?,
    };
    let repository = MapRepository::with_limit(FileStore::new(data_dir), settings.history_limit);
    let mut session = MapSession::open(repository, settings.save_delay())?;

    let mut system_clipboard = if cli.command.needs_clipboard() {
        Some(SystemClipboard::new()?)
    } else {
        None
    };
    let clipboard = system_clipboard
        .as_mut()
        .map(|clipboard| clipboard as &mut dyn ClipboardBackend);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &settings, &mut session, clipboard, &mut out)
}

/// Execute one command and persist its result.
pub fn execute<S: KeyValueStore>(
    command: Commands,
    settings: &Settings,
    session: &mut MapSession<S>,
    clipboard: Option<&mut dyn ClipboardBackend>,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Show { board, ids, all } => {
            let tree = session.tree();
            let text = if board {
                render_board(tree, ids)
            } else {
                render_outline(tree, ids, all)
            };
            if text.is_empty() {
                writeln!(out, "(empty map)")?;
            } else {
                writeln!(out, "{}", text)?;
            }
        }
        Commands::Add {
            description,
            parent,
            index,
        } => {
            let parent_id = match parent {
                Some(parent) => resolve_id(session.tree(), &parent)?,
                None => ROOT_ID.to_string(),
            };
            let changed = session.apply(EditIntent::Add {
                parent_id,
                description,
                index,
            })?;
            report(out, changed, "Added item", "Nothing added (empty description)")?;
        }
        Commands::Edit { id, description } => {
            let id = resolve_id(session.tree(), &id)?;
            let changed = session.apply(EditIntent::SetDescription { id, description })?;
            report(out, changed, "Updated item", "No change")?;
        }
        Commands::Delete { id } => {
            let id = resolve_id(session.tree(), &id)?;
            let changed = session.apply(EditIntent::Delete { id })?;
            report(out, changed, "Deleted item", "No change")?;
        }
        Commands::Move {
            id,
            placement,
            target,
            index,
        } => {
            let id = resolve_id(session.tree(), &id)?;
            let target_id = resolve_id(session.tree(), &target)?;
            let intent = match (placement, index) {
                (DropPlacement::Into, Some(index)) => EditIntent::Move {
                    id,
                    parent_id: target_id,
                    index,
                },
                _ => {
                    let payload = session
                        .tree()
                        .find(&id)
                        .map(encode_payload)
                        .unwrap_or_default();
                    EditIntent::Drop {
                        payload,
                        target_id,
                        placement,
                    }
                }
            };
            let changed = session.apply(intent)?;
            report(out, changed, "Moved item", "No change")?;
        }
        Commands::Expand { id } => {
            let id = resolve_id(session.tree(), &id)?;
            let changed = session.apply(EditIntent::SetExpanded { id, expanded: true })?;
            report(out, changed, "Expanded", "Already expanded")?;
        }
        Commands::Collapse { id } => {
            let id = resolve_id(session.tree(), &id)?;
            let changed = session.apply(EditIntent::SetExpanded {
                id,
                expanded: false,
            })?;
            report(out, changed, "Collapsed", "Already collapsed")?;
        }
        Commands::Toggle { id } => {
            let id = resolve_id(session.tree(), &id)?;
            let changed = session.apply(EditIntent::ToggleExpanded { id })?;
            report(out, changed, "Toggled", "No change")?;
        }
        Commands::Undo => {
            let moved = session.undo()?;
            report(out, moved, "Undone", "Nothing to undo")?;
        }
        Commands::Redo => {
            let moved = session.redo()?;
            report(out, moved, "Redone", "Nothing to redo")?;
        }
        Commands::History => {
            let status = session.status()?;
            writeln!(
                out,
                "snapshot {} of {} (undo: {}, redo: {})",
                status.len.saturating_sub(status.index),
                status.len,
                if status.can_undo { "yes" } else { "no" },
                if status.can_redo { "yes" } else { "no" },
            )?;
        }
        Commands::Import { path } => {
            session.import_file(&path, &settings.markdown_options())?;
            writeln!(
                out,
                "Imported {} item(s) from {}",
                session.tree().descendant_count(),
                path.display()
            )?;
        }
        Commands::Export { path, format } => {
            let tree = session.committed_tree()?;
            let format = format.map(ListFormat::from).unwrap_or(ListFormat::Markdown);
            let written = export_map_file(
                &tree,
                &path,
                &settings.export_file_name,
                format,
                settings.indent_width,
            )?;
            writeln!(out, "Exported to {}", written.display())?;
        }
        Commands::Copy { id, format } => {
            let clipboard = clipboard.ok_or_else(clipboard_unavailable)?;
            let tree = session.tree();
            let item = match id {
                Some(id) => {
                    let id = resolve_id(tree, &id)?;
                    tree.find(&id).cloned().unwrap_or_else(|| tree.clone())
                }
                None => tree.clone(),
            };
            let format = format
                .map(ListFormat::from)
                .unwrap_or(settings.clipboard_format);
            copy_item(clipboard, &item, format, settings.indent_width)?;
            writeln!(out, "Copied to clipboard")?;
        }
        Commands::Paste => {
            let clipboard = clipboard.ok_or_else(clipboard_unavailable)?;
            session.paste(clipboard, &settings.markdown_options())?;
            writeln!(
                out,
                "Pasted {} item(s)",
                session.tree().descendant_count()
            )?;
        }
        Commands::Reset => {
            session.reset()?;
            writeln!(out, "Map reset")?;
        }
        Commands::Config(args) => {
            configure(args, settings, &get_config_dir()?, out)?;
        }
    }

    if session.flush()? {
        info!("Saved map");
    }
    Ok(())
}

/// Apply `args` to `settings`, save the result as `config.json` in
/// `config_dir` when anything changed, and print it.
pub fn configure(
    args: ConfigArgs,
    settings: &Settings,
    config_dir: &Path,
    out: &mut dyn Write,
) -> Result<Settings> {
    let mut updated = settings.clone();
    if args.apply_to(&mut updated) {
        updated.sanitize();
        save_config_to(&updated, config_dir)?;
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&updated)?)?;
    Ok(updated)
}

fn clipboard_unavailable() -> Error {
    Error::Application("Clipboard is not available".to_string())
}

fn report(out: &mut dyn Write, changed: bool, done: &str, unchanged: &str) -> Result<()> {
    writeln!(out, "{}", if changed { done } else { unchanged })?;
    Ok(())
}

/// Resolve a full id or a unique id prefix.
pub fn resolve_id(tree: &Item, given: &str) -> Result<String> {
    if tree.contains(given) {
        return Ok(given.to_string());
    }
    let mut matches = Vec::new();
    collect_prefix_matches(tree, given, &mut matches);
    match matches.as_slice() {
        [only] => Ok(only.clone()),
        [] => Err(Error::Application(format!("No item with id '{}'", given))),
        _ => Err(Error::Application(format!(
            "Id prefix '{}' matches {} items",
            given,
            matches.len()
        ))),
    }
}

fn collect_prefix_matches(item: &Item, prefix: &str, matches: &mut Vec<String>) {
    if !prefix.is_empty() && item.id.starts_with(prefix) {
        matches.push(item.id.clone());
    }
    for child in &item.children {
        collect_prefix_matches(child, prefix, matches);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Indented outline. Items with hidden children are marked `+`.
pub fn render_outline(tree: &Item, ids: bool, all: bool) -> String {
    let mut lines = Vec::new();
    let top: &[Item] = if tree.is_root() {
        &tree.children
    } else {
        std::slice::from_ref(tree)
    };
    for item in top {
        outline_item(item, 0, ids, all, &mut lines);
    }
    lines.join("\n")
}

fn outline_item(item: &Item, depth: usize, ids: bool, all: bool, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let marker = if item.has_children() && !item.is_expanded {
        '+'
    } else {
        '-'
    };
    let id = if ids {
        format!("[{}] ", short_id(&item.id))
    } else {
        String::new()
    };

    let mut text = item.description.split('\n');
    lines.push(format!(
        "{}{} {}{}",
        indent,
        marker,
        id,
        text.next().unwrap_or_default()
    ));
    for continuation in text {
        lines.push(format!("{}  {}", indent, continuation));
    }

    if item.is_expanded || all {
        for child in &item.children {
            outline_item(child, depth + 1, ids, all, lines);
        }
    }
}

/// Board view: an expanded item with children gets a column of its own;
/// runs of other items share one.
pub fn render_board(tree: &Item, ids: bool) -> String {
    let mut columns = Vec::new();
    for group in group_children(tree) {
        let members = &tree.children[group.start..group.next_start];
        let column = match group.kind {
            GroupKind::Parent => {
                let mut column = Vec::new();
                for parent in members {
                    column.push(format!("== {} ==", title(parent, ids)));
                    for child in &parent.children {
                        outline_item(child, 1, ids, false, &mut column);
                    }
                }
                column
            }
            GroupKind::Childless => members
                .iter()
                .map(|item| {
                    let marker = if item.has_children() { '+' } else { '*' };
                    format!("{} {}", marker, title(item, ids))
                })
                .collect(),
        };
        columns.push(column.join("\n"));
    }
    columns.join("\n\n")
}

fn title(item: &Item, ids: bool) -> String {
    let first_line = item.description.lines().next().unwrap_or_default();
    if ids {
        format!("[{}] {}", short_id(&item.id), first_line)
    } else {
        first_line.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::clipboard::tests::FakeClipboard;
    use crate::history::MemoryStore;
    use crate::map::create_empty_map;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Harness {
        settings: Settings,
        session: MapSession<MemoryStore>,
        clipboard: FakeClipboard,
    }

    impl Harness {
        fn new() -> Self {
            let session = MapSession::open(
                MapRepository::new(MemoryStore::new()),
                Duration::from_millis(500),
            )
            .unwrap();
            Self {
                settings: Settings::default(),
                session,
                clipboard: FakeClipboard::default(),
            }
        }

        fn run(&mut self, args: &[&str]) -> Result<String> {
            let mut argv = vec!["storymap"];
            argv.extend_from_slice(args);
            let cli = Cli::try_parse_from(argv).expect("arguments should parse");
            let mut out = Vec::new();
            execute(
                cli.command,
                &self.settings,
                &mut self.session,
                Some(&mut self.clipboard),
                &mut out,
            )?;
            Ok(String::from_utf8(out).expect("utf-8 output"))
        }

        fn id_of(&self, description: &str) -> String {
            fn find<'a>(item: &'a Item, description: &str) -> Option<&'a Item> {
                if item.description == description {
                    return Some(item);
                }
                item.children.iter().find_map(|c| find(c, description))
            }
            find(self.session.tree(), description)
                .map(|item| item.id.clone())
                .expect("item should exist")
        }
    }

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from(["storymap", "move", "abc", "after", "def"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Move {
                placement: DropPlacement::After,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["storymap", "--data-dir", "/tmp/x", "show", "--board"])
            .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));

        assert!(Cli::try_parse_from(["storymap", "move", "a", "sideways", "b"]).is_err());
        assert!(Cli::try_parse_from(["storymap", "export", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_add_show_and_persist() {
        let mut h = Harness::new();
        assert_eq!(h.run(&["show"]).unwrap(), "(empty map)\n");

        h.run(&["add", "Epic"]).unwrap();
        let epic = h.id_of("Epic");
        h.run(&["add", "Story", "--parent", &epic]).unwrap();
        assert!(!h.session.has_pending_save());

        assert_eq!(h.run(&["show"]).unwrap(), "+ Epic\n");
        assert_eq!(h.run(&["show", "--all"]).unwrap(), "+ Epic\n  - Story\n");

        h.run(&["expand", &epic[..6]]).unwrap();
        assert_eq!(h.run(&["show"]).unwrap(), "- Epic\n  - Story\n");
        assert_eq!(h.session.status().unwrap().len, 3);
    }

    #[test]
    fn test_show_ids() {
        let mut h = Harness::new();
        h.run(&["add", "Epic"]).unwrap();
        let epic = h.id_of("Epic");
        let shown = h.run(&["show", "--ids"]).unwrap();
        assert_eq!(shown, format!("- [{}] Epic\n", &epic[..SHORT_ID_LEN]));
    }

    #[test]
    fn test_edit_delete_and_undo() {
        let mut h = Harness::new();
        h.run(&["add", "Draft"]).unwrap();
        let id = h.id_of("Draft");

        assert_eq!(h.run(&["edit", &id, "Final"]).unwrap(), "Updated item\n");
        assert_eq!(h.run(&["edit", &id, "Final"]).unwrap(), "No change\n");
        assert_eq!(h.run(&["edit", &id, "  "]).unwrap(), "Updated item\n");
        assert!(h.session.tree().children.is_empty());

        assert_eq!(h.run(&["undo"]).unwrap(), "Undone\n");
        assert_eq!(h.run(&["show"]).unwrap(), "- Final\n");
        assert_eq!(h.run(&["redo"]).unwrap(), "Redone\n");
        assert_eq!(h.run(&["redo"]).unwrap(), "Nothing to redo\n");

        assert!(matches!(
            h.run(&["delete", "nonexistent"]),
            Err(Error::Application(_))
        ));
    }

    #[test]
    fn test_root_cannot_be_deleted() {
        let mut h = Harness::new();
        assert!(matches!(
            h.run(&["delete", ROOT_ID]),
            Err(Error::RootProtected { .. })
        ));
    }

    #[test]
    fn test_move_forms() {
        let mut h = Harness::new();
        for text in ["A", "B", "C"] {
            h.run(&["add", text]).unwrap();
        }
        let (a, c) = (h.id_of("A"), h.id_of("C"));

        h.run(&["move", &a, "after", &c]).unwrap();
        assert_eq!(h.run(&["show"]).unwrap(), "- B\n- C\n- A\n");

        h.run(&["move", &c, "into", &a, "--index", "0"]).unwrap();
        h.run(&["expand", &a]).unwrap();
        assert_eq!(h.run(&["show"]).unwrap(), "- B\n- A\n  - C\n");

        assert_eq!(h.run(&["move", &a, "into", &c]).unwrap(), "No change\n");
    }

    #[test]
    fn test_history_output() {
        let mut h = Harness::new();
        h.run(&["add", "A"]).unwrap();
        h.run(&["add", "B"]).unwrap();
        h.run(&["undo"]).unwrap();
        assert_eq!(
            h.run(&["history"]).unwrap(),
            "snapshot 1 of 2 (undo: no, redo: yes)\n"
        );
    }

    #[test]
    fn test_copy_and_paste() {
        let mut h = Harness::new();
        h.run(&["add", "Epic"]).unwrap();
        h.run(&["copy"]).unwrap();
        assert_eq!(h.clipboard.text.as_deref(), Some("- Epic"));

        h.run(&["copy", "--format", "html"]).unwrap();
        assert!(h.clipboard.html.as_deref().unwrap().contains("<li>Epic</li>"));

        h.clipboard.text = Some("- One\n- Two".to_string());
        h.clipboard.html = None;
        assert_eq!(h.run(&["paste"]).unwrap(), "Pasted 2 item(s)\n");
        assert_eq!(h.run(&["show"]).unwrap(), "- One\n- Two\n");
    }

    #[test]
    fn test_import_export_reset() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("in.md");
        std::fs::write(&source, "- Imported\n  - Child\n").unwrap();

        let mut h = Harness::new();
        h.run(&["import", source.to_str().unwrap()]).unwrap();
        assert_eq!(h.run(&["show"]).unwrap(), "- Imported\n  - Child\n");

        let out_dir = temp_dir.path().to_str().unwrap().to_string();
        h.run(&["export", &out_dir]).unwrap();
        let exported = std::fs::read_to_string(temp_dir.path().join("exported-markdown.md")).unwrap();
        assert_eq!(exported, "- Imported\n  - Child\n");

        h.run(&["export", &out_dir, "--format", "html"]).unwrap();
        assert!(temp_dir.path().join("exported-markdown.html").exists());

        h.run(&["reset"]).unwrap();
        assert_eq!(h.session.tree(), &create_empty_map());
    }

    #[test]
    fn test_toggle_reports_each_flip() {
        let mut h = Harness::new();
        h.run(&["add", "Epic"]).unwrap();
        let epic = h.id_of("Epic");
        assert_eq!(h.run(&["toggle", &epic]).unwrap(), "Toggled\n");
        assert!(h.session.tree().children[0].is_expanded);
        assert_eq!(h.run(&["toggle", &epic]).unwrap(), "Toggled\n");
        assert!(!h.session.tree().children[0].is_expanded);
        assert_eq!(h.session.status().unwrap().len, 3);
    }

    fn config_args(args: &[&str]) -> ConfigArgs {
        let mut argv = vec!["storymap", "config"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).expect("arguments should parse").command {
            Commands::Config(args) => args,
            other => panic!("expected config command, got {:?}", other),
        }
    }

    #[test]
    fn test_config_saves_sanitized_settings() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let args = config_args(&[
            "--indent",
            "four",
            "--clipboard-format",
            "html",
            "--expand-parsed",
            "false",
            "--history-limit",
            "5000",
            "--export-file-name",
            "out/board.md",
        ]);

        let mut out = Vec::new();
        let updated = configure(args, &Settings::default(), temp_dir.path(), &mut out).unwrap();
        assert_eq!(updated.indent_width, IndentWidth::Four);
        assert_eq!(updated.clipboard_format, ListFormat::Html);
        assert!(!updated.expand_parsed_items);
        assert_eq!(updated.history_limit, Settings::MAX_HISTORY_LIMIT);
        assert_eq!(updated.export_file_name, "board.md");

        let saved = crate::config::load_config_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(saved, updated);
        assert!(String::from_utf8(out).unwrap().contains("\"history_limit\": 1000"));
    }

    #[test]
    fn test_config_without_flags_only_prints() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut out = Vec::new();
        let shown = configure(
            config_args(&[]),
            &Settings::default(),
            temp_dir.path(),
            &mut out,
        )
        .unwrap();
        assert_eq!(shown, Settings::default());
        assert!(!temp_dir.path().join("config.json").exists());
        assert!(!out.is_empty());
    }

    #[test]
    fn test_resolve_id_prefixes() {
        let tree = create_empty_map().with_children(vec![
            Item::new("abc1", "one", false),
            Item::new("abd2", "two", false),
        ]);
        assert_eq!(resolve_id(&tree, "abc").unwrap(), "abc1");
        assert_eq!(resolve_id(&tree, "abd2").unwrap(), "abd2");
        assert!(resolve_id(&tree, "ab").is_err());
        assert!(resolve_id(&tree, "zz").is_err());
        assert!(resolve_id(&tree, "").is_err());
    }

    #[test]
    fn test_render_board() {
        let tree = create_empty_map().with_children(vec![
            Item::new("a", "Loose", false),
            Item::new("b", "Epic", true).with_children(vec![Item::new("c", "Story", false)]),
            Item::new("d", "Folded", false).with_children(vec![Item::new("e", "Hidden", false)]),
            Item::new("f", "Tail", false),
        ]);
        assert_eq!(
            render_board(&tree, false),
            "* Loose\n\n== Epic ==\n  - Story\n\n+ Folded\n* Tail"
        );
    }

    #[test]
    fn test_render_outline_multiline() {
        let tree = create_empty_map()
            .with_children(vec![Item::new("a", "Title\nmore", true)
                .with_children(vec![Item::new("b", "Child", true)])]);
        assert_eq!(render_outline(&tree, false, false), "- Title\n  more\n  - Child");
    }
}
