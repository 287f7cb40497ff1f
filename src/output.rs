//! CLI output formatting for the transform and check commands.
//!
//! # Information-First Display
//!
//! Menu entries are shown by their identity in the menu: positional index and
//! humanized title. The hash link behind an entry is secondary context on an
//! indented `Link:` line, so the output reads as the menu a visitor will see
//! while still tracing back to the page that backs each entry.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Menu
//! 001 fr_ca (2 pages)
//!     001 Help (2 pages)
//!         Link: fr_ca%3AHelp
//!         001 Categ 1 (1 page)
//!             001 Categ 2 (1 page)
//!                 001 Page
//! 002 en (4 pages)
//!     ...
//!
//! Found 6 pages in 2 locales
//! ```
//!
//! A single-language wiki has no locale level, so the summary is just
//! `Found 6 pages`.
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 en:Help.html
//! 002 en:Help:Landing-Some-Page.html
//!
//! Menus
//! 001 en:_menu_.html
//!
//! Generated 2 pages, 1 menu
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::menu::MenuNode;
use crate::naming::humanize;
use crate::transform::TransformReport;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Format an entity header: positional index + title, with an optional page
/// count for categories.
///
/// ```text
/// 001 Categ page (2 pages)
/// 002 Landing Some Page
/// ```
fn entity_header(index: usize, title: &str, pages: Option<usize>) -> String {
    match pages {
        Some(n) => format!("{} {} ({})", format_index(index), title, plural(n, "page")),
        None => format!("{} {}", format_index(index), title),
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the menu tree.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    key: &'a str,
    link: Option<&'a str>,
    /// Page count for categories, `None` for items.
    pages: Option<usize>,
}

/// Walk the menu tree below `root`, assigning positional indices per sibling
/// level. The root itself is not included.
fn walk_menu_tree(root: &MenuNode) -> Vec<TreeNode<'_>> {
    let mut nodes = Vec::new();
    walk_menu_tree_recursive(root, 0, &mut nodes);
    nodes
}

fn walk_menu_tree_recursive<'a>(node: &'a MenuNode, depth: usize, nodes: &mut Vec<TreeNode<'a>>) {
    let Some(children) = node.children() else {
        return;
    };
    for (i, (key, child)) in children.iter().enumerate() {
        nodes.push(TreeNode {
            depth,
            position: i + 1,
            key,
            link: child.link(),
            pages: (!child.is_item()).then(|| child.page_count()),
        });
        walk_menu_tree_recursive(child, depth + 1, nodes);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the menu tree the wiki would produce.
///
/// Items show their title only; categories add their page count and, when
/// they have a page of their own, its link. With `multilang` the top level
/// holds the locales and the summary counts them.
pub fn format_check_output(tree: &MenuNode, multilang: bool) -> Vec<String> {
    let mut lines = vec!["Menu".to_string()];

    for node in walk_menu_tree(tree) {
        let base = indent(node.depth);
        lines.push(format!(
            "{}{}",
            base,
            entity_header(node.position, &humanize(node.key), node.pages)
        ));
        if let (Some(_), Some(link)) = (node.pages, node.link) {
            lines.push(format!("{}    Link: {}", base, link));
        }
    }

    let pages = plural(tree.page_count(), "page");
    lines.push(String::new());
    if multilang {
        let locales = tree.children().map(|c| c.len()).unwrap_or_default();
        lines.push(format!("Found {} in {}", pages, plural(locales, "locale")));
    } else {
        lines.push(format!("Found {}", pages));
    }
    lines
}

pub fn print_check_output(tree: &MenuNode, multilang: bool) {
    for line in format_check_output(tree, multilang) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the files a transform wrote.
pub fn format_transform_output(report: &TransformReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in report.pages.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), page));
        }
        lines.push(String::new());
    }

    if !report.menus.is_empty() {
        lines.push("Menus".to_string());
        for (i, menu) in report.menus.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), menu));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Generated {}, {}",
        plural(report.pages.len(), "page"),
        plural(report.menus.len(), "menu")
    ));
    lines
}

pub fn print_transform_output(report: &TransformReport) {
    for line in format_transform_output(report) {
        println!("{}", line);
    }
}
