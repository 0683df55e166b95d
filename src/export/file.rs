//! Import and export of maps as files

use crate::codec::{parse_markdown, IndentWidth, ListFormat, MarkdownOptions};
use crate::error::{Error, Result};
use crate::map::Item;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a bullet-list file into a map.
///
/// Parsing is lenient: a file without list lines yields an empty map.
pub fn import_markdown_file(path: &Path, options: &MarkdownOptions) -> Result<Item> {
    let contents = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let map = parse_markdown(&contents, options)?;
    info!(
        "Imported {} item(s) from {}",
        map.descendant_count(),
        path.display()
    );
    Ok(map)
}

/// Where an export lands: `target` itself, or `file_name` inside it when
/// `target` is an existing directory.
///
/// For markup exports into a directory the file name's extension follows
/// the format.
pub fn resolve_export_path(target: &Path, file_name: &str, format: ListFormat) -> PathBuf {
    if !target.is_dir() {
        return target.to_path_buf();
    }
    let path = target.join(file_name);
    match format {
        ListFormat::Markdown => path,
        ListFormat::Html => path.with_extension(format.extension()),
    }
}

/// Write `tree` in `format` and return the path written.
pub fn export_map_file(
    tree: &Item,
    target: &Path,
    file_name: &str,
    format: ListFormat,
    indent: IndentWidth,
) -> Result<PathBuf> {
    let path = resolve_export_path(target, file_name, format);
    let mut contents = format.render(tree, indent);
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(&path, contents).map_err(|e| Error::FileWrite {
        path: path.clone(),
        source: e,
    })?;
    info!("Exported map to {}", path.display());
    Ok(path)
}

/// Write `tree` as a bullet list.
pub fn export_markdown_file(
    tree: &Item,
    target: &Path,
    file_name: &str,
    indent: IndentWidth,
) -> Result<PathBuf> {
    export_map_file(tree, target, file_name, ListFormat::Markdown, indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXPORT_FILE_NAME;
    use crate::map::create_empty_map;
    use tempfile::TempDir;

    fn sample() -> Item {
        create_empty_map().with_children(vec![
            Item::new("a", "Epic", true).with_children(vec![Item::new("b", "Story", true)]),
            Item::new("c", "Next", true),
        ])
    }

    #[test]
    fn test_export_into_directory_uses_file_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = export_markdown_file(
            &sample(),
            temp_dir.path(),
            DEFAULT_EXPORT_FILE_NAME,
            IndentWidth::Two,
        )
        .unwrap();

        assert_eq!(path, temp_dir.path().join("exported-markdown.md"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "- Epic\n  - Story\n- Next\n"
        );
    }

    #[test]
    fn test_export_to_explicit_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("board.html");
        let path = export_map_file(
            &sample(),
            &target,
            DEFAULT_EXPORT_FILE_NAME,
            ListFormat::Html,
            IndentWidth::Two,
        )
        .unwrap();
        assert_eq!(path, target);
        assert!(fs::read_to_string(&path).unwrap().contains("<li>Next</li>"));
    }

    #[test]
    fn test_html_export_into_directory_swaps_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = resolve_export_path(temp_dir.path(), DEFAULT_EXPORT_FILE_NAME, ListFormat::Html);
        assert_eq!(path, temp_dir.path().join("exported-markdown.html"));
    }

    #[test]
    fn test_export_empty_map_writes_empty_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = export_markdown_file(
            &create_empty_map(),
            temp_dir.path(),
            "empty.md",
            IndentWidth::Two,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("missing").join("map.md");
        assert!(matches!(
            export_markdown_file(&sample(), &target, "x.md", IndentWidth::Two),
            Err(Error::FileWrite { .. })
        ));
    }

    #[test]
    fn test_import_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path =
            export_markdown_file(&sample(), temp_dir.path(), "map.md", IndentWidth::Four).unwrap();

        let map = import_markdown_file(&path, &MarkdownOptions::default()).unwrap();
        assert_eq!(map.children.len(), 2);
        assert_eq!(map.children[0].description, "Epic");
        assert_eq!(map.children[0].children[0].description, "Story");
    }

    #[test]
    fn test_import_prose_is_empty_map() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("notes.md");
        fs::write(&path, "# Notes\n\nNothing listed.\n").unwrap();
        let map = import_markdown_file(&path, &MarkdownOptions::default()).unwrap();
        assert!(map.children.is_empty());
    }

    #[test]
    fn test_import_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = import_markdown_file(
            &temp_dir.path().join("absent.md"),
            &MarkdownOptions::default(),
        );
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
