//! Shared test utilities for the wiki2html test suite.
//!
//! Provides the sample wiki used across module tests, an in-memory storage
//! preloaded with it, fixture directories on disk, and menu tree assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tree = MenuTreeBuilder::new(&multilang_parser(), "%3A").build(&sample_wiki_files());
//! assert_menu_shape(tree.descend(["en", "Help"]).unwrap(), &[
//!     ("Landing-Some-Page", &[]),
//!     ("Categ-page", &["Item-page-1", "Item-page-2"]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::menu::MenuNode;
use crate::naming::FilenameParser;
use crate::storage::tests::MockStorage;

// =========================================================================
// Sample wiki
// =========================================================================

/// Wiki filenames covering two locales, nested categories and a category
/// with its own page. Listed in the order a directory listing would give.
pub fn sample_wiki_files() -> Vec<String> {
    [
        "en:Help.md",
        "en:Help:Landing-Some-Page.md",
        "en:Help:Categ-page:Item-page-1.md",
        "en:Help:Categ-page:Item-page-2.md",
        "fr_ca:Help.md",
        "fr_ca:Help:Categ-1:Categ-2:Page.md",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Parser for `<locale>:<path>` names accepting any markdown file.
pub fn multilang_parser() -> FilenameParser {
    FilenameParser::new(":", true, "", None).unwrap()
}

/// In-memory storage with `src` holding the sample wiki and an empty `dest`.
///
/// Each page's content is a heading made from its last segment.
pub fn mock_wiki() -> MockStorage {
    let pages: Vec<(String, String)> = sample_wiki_files()
        .into_iter()
        .map(|name| {
            let title = name
                .trim_end_matches(".md")
                .rsplit(':')
                .next()
                .unwrap_or_default()
                .replace('-', " ");
            (name, format!("# {title}\n"))
        })
        .collect();
    let files: Vec<(&str, &str)> = pages
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_str()))
        .collect();
    MockStorage::with_files("src", "dest", &files)
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/wiki/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/wiki");
    copy_dir(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.path().is_file() {
            std::fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }
    Ok(())
}

// =========================================================================
// Menu tree helpers
// =========================================================================

/// Child keys of `node` in menu order. Empty for items.
pub fn child_keys(node: &MenuNode) -> Vec<&str> {
    node.children()
        .map(|children| children.keys().collect())
        .unwrap_or_default()
}

/// Assert the two top levels under `node`.
///
/// Each entry is `(key, children)`. Use `&[]` for items.
pub fn assert_menu_shape(node: &MenuNode, expected: &[(&str, &[&str])]) {
    let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| *k).collect();
    assert_eq!(child_keys(node), expected_keys, "menu keys mismatch");

    for (key, children) in expected {
        let child = node.child(key).unwrap_or_else(|| panic!("menu entry '{key}' not found"));
        assert_eq!(
            child_keys(child),
            children.to_vec(),
            "children of '{key}' mismatch"
        );
    }
}
