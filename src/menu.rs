//! Menu tree construction.
//!
//! Ordered filenames fold into a tree keyed by path segment. In
//! multi-language mode the root's children are the locales:
//!
//! ```text
//! en:Help.md                          (root)
//! en:Help:Landing-Some-Page.md        └── en
//! en:Help:Categ-page:Item-page-1.md       └── Help              link en%3AHelp
//!                                             ├── Landing-Some-Page  link en%3AHelp%3ALanding-Some-Page
//!                                             └── Categ-page
//!                                                 └── Item-page-1    link en%3AHelp%3ACateg-page%3AItem-page-1
//! ```
//!
//! Siblings keep first-insertion order, which is the menu order produced by
//! [`crate::ordering`]. Links are the canonical key with every separator
//! replaced by the hash separator. In multi-language mode a filename
//! without a locale has no menu to belong to and is left out.

use crate::naming::FilenameParser;
use std::collections::HashMap;
use tracing::debug;

/// Children of a menu node, iterated in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Children<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Children<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    fn map<U>(self, mut f: impl FnMut(T) -> U) -> Children<U> {
        Children {
            entries: self
                .entries
                .into_iter()
                .map(|(key, node)| (key, f(node)))
                .collect(),
            index: self.index,
        }
    }
}

impl<T: Default> Children<T> {
    fn get_or_insert(&mut self, key: &str) -> &mut T {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.to_string(), T::default()));
                let i = self.entries.len() - 1;
                self.index.insert(key.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }
}

pub type MenuChildren = Children<MenuNode>;

/// One vertex of the navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuNode {
    /// A page with no pages below it.
    Item { link: String },
    /// A group of pages, optionally with its own page.
    Category {
        link: Option<String>,
        children: MenuChildren,
    },
}

impl Default for MenuNode {
    fn default() -> Self {
        MenuNode::Category {
            link: None,
            children: MenuChildren::default(),
        }
    }
}

impl MenuNode {
    pub fn link(&self) -> Option<&str> {
        match self {
            MenuNode::Item { link } => Some(link),
            MenuNode::Category { link, .. } => link.as_deref(),
        }
    }

    pub fn children(&self) -> Option<&MenuChildren> {
        match self {
            MenuNode::Item { .. } => None,
            MenuNode::Category { children, .. } => Some(children),
        }
    }

    pub fn child(&self, key: &str) -> Option<&MenuNode> {
        self.children().and_then(|children| children.get(key))
    }

    /// Follow a path of segment keys from this node.
    pub fn descend<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> Option<&MenuNode> {
        path.into_iter()
            .try_fold(self, |node, key| node.child(key))
    }

    pub fn is_item(&self) -> bool {
        matches!(self, MenuNode::Item { .. })
    }

    /// A category with neither its own page nor children.
    pub fn is_empty(&self) -> bool {
        match self {
            MenuNode::Item { .. } => false,
            MenuNode::Category { link, children } => link.is_none() && children.is_empty(),
        }
    }

    /// Number of pages (nodes with a link) in this subtree.
    pub fn page_count(&self) -> usize {
        match self {
            MenuNode::Item { .. } => 1,
            MenuNode::Category { link, children } => {
                usize::from(link.is_some())
                    + children.iter().map(|(_, node)| node.page_count()).sum::<usize>()
            }
        }
    }
}

/// Node under construction: any node may still gain children or a link.
#[derive(Debug, Default)]
struct Draft {
    link: Option<String>,
    children: Children<Draft>,
}

impl Draft {
    fn finish(self) -> MenuNode {
        match (self.link, self.children.is_empty()) {
            (Some(link), true) => MenuNode::Item { link },
            (link, _) => MenuNode::Category {
                link,
                children: self.children.map(Draft::finish),
            },
        }
    }
}

/// Folds ordered filenames into a [`MenuNode`] tree.
#[derive(Debug, Clone)]
pub struct MenuTreeBuilder<'a> {
    parser: &'a FilenameParser,
    hash_separator: &'a str,
}

impl<'a> MenuTreeBuilder<'a> {
    pub fn new(parser: &'a FilenameParser, hash_separator: &'a str) -> Self {
        Self {
            parser,
            hash_separator,
        }
    }

    /// Build the tree for `files`, which must already be in menu order.
    ///
    /// The root is always a category. Repeated filenames are idempotent.
    pub fn build<S: AsRef<str>>(&self, files: &[S]) -> MenuNode {
        let mut root = Draft::default();

        for name in files {
            let Some(parsed) = self.parser.parse(name.as_ref()) else {
                continue;
            };
            if self.parser.is_multilang() && parsed.locale.is_none() {
                debug!(file = name.as_ref(), "no locale, left out of the menus");
                continue;
            }

            let mut node = &mut root;
            for segment in parsed.locale.iter().chain(&parsed.segments) {
                node = node.children.get_or_insert(segment);
            }
            node.link = Some(
                parsed
                    .canonical_key
                    .replace(self.parser.separator(), self.hash_separator),
            );
        }

        root.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        assert_menu_shape, child_keys as keys, multilang_parser, sample_wiki_files,
    };

    fn build(files: &[&str]) -> MenuNode {
        MenuTreeBuilder::new(&multilang_parser(), "%3A").build(files)
    }

    #[test]
    fn locales_are_top_level() {
        let tree = build(&["en:Help.md", "fr_ca:Help.md"]);
        assert_eq!(keys(&tree), vec!["en", "fr_ca"]);
    }

    #[test]
    fn leaf_gets_encoded_link() {
        let tree = build(&["en:Help:Categ-page:Item-page-1.md"]);
        let item = tree
            .descend(["en", "Help", "Categ-page", "Item-page-1"])
            .unwrap();
        assert_eq!(
            item,
            &MenuNode::Item {
                link: "en%3AHelp%3ACateg-page%3AItem-page-1".to_string()
            }
        );
    }

    #[test]
    fn intermediate_nodes_are_pure_categories() {
        let tree = build(&["en:Help:Categ-page:Item-page-1.md"]);
        let categ = tree.descend(["en", "Help", "Categ-page"]).unwrap();
        assert!(!categ.is_item());
        assert_eq!(categ.link(), None);
    }

    #[test]
    fn category_with_own_page_keeps_both() {
        // Page first, children later
        let tree = build(&["en:Help.md", "en:Help:Sub.md"]);
        let help = tree.descend(["en", "Help"]).unwrap();
        assert_eq!(help.link(), Some("en%3AHelp"));
        assert_eq!(keys(help), vec!["Sub"]);

        // Children first, page later
        let tree = build(&["en:Help:Sub.md", "en:Help.md"]);
        let help = tree.descend(["en", "Help"]).unwrap();
        assert_eq!(help.link(), Some("en%3AHelp"));
        assert_eq!(keys(help), vec!["Sub"]);
    }

    #[test]
    fn siblings_keep_insertion_order() {
        let tree = build(&["en:Help:Zeta.md", "en:Help:Alpha.md", "en:Help:Mid.md"]);
        let help = tree.descend(["en", "Help"]).unwrap();
        assert_eq!(keys(help), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn repeated_files_are_idempotent() {
        let once = build(&["en:Help:A.md", "en:Help:B.md"]);
        let twice = build(&["en:Help:A.md", "en:Help:B.md", "en:Help:A.md"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn building_twice_gives_equal_trees() {
        let files = sample_wiki_files();
        assert_eq!(
            MenuTreeBuilder::new(&multilang_parser(), "%3A").build(&files),
            MenuTreeBuilder::new(&multilang_parser(), "%3A").build(&files)
        );
    }

    #[test]
    fn sample_tree_shape() {
        let tree = MenuTreeBuilder::new(&multilang_parser(), "%3A").build(&sample_wiki_files());
        assert_menu_shape(
            tree.descend(["en", "Help"]).unwrap(),
            &[
                ("Landing-Some-Page", &[]),
                ("Categ-page", &["Item-page-1", "Item-page-2"]),
            ],
        );
        let fr_page = tree
            .descend(["fr_ca", "Help", "Categ-1", "Categ-2", "Page"])
            .unwrap();
        assert!(fr_page.is_item());
        assert_eq!(tree.page_count(), 6);
    }

    #[test]
    fn custom_hash_separator() {
        let tree = MenuTreeBuilder::new(&multilang_parser(), "/").build(&["en:Help:Page.md"]);
        assert_eq!(
            tree.descend(["en", "Help", "Page"]).unwrap().link(),
            Some("en/Help/Page")
        );
    }

    #[test]
    fn empty_input_gives_empty_root() {
        let tree = build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.page_count(), 0);
    }

    #[test]
    fn missing_path_is_none() {
        let tree = build(&["en:Help.md"]);
        assert!(tree.descend(["de", "Help"]).is_none());
        assert!(tree.descend(["en", "Help", "Deeper"]).is_none());
    }

    #[test]
    fn files_without_locale_are_left_out() {
        let parser = FilenameParser::new(":", true, "", Some(r".*\.md$")).unwrap();
        let tree = MenuTreeBuilder::new(&parser, "%3A").build(&["Help:Page.md", "en:Help:Page.md"]);
        assert_eq!(keys(&tree), vec!["en"]);
    }

    #[test]
    fn single_language_paths_start_at_root() {
        let parser = FilenameParser::new(":", false, "", None).unwrap();
        let tree = MenuTreeBuilder::new(&parser, "%3A").build(&["Help:Page.md", "en:Help.md"]);
        assert_eq!(keys(&tree), vec!["Help", "en"]);
        assert_eq!(
            tree.descend(["Help", "Page"]).unwrap().link(),
            Some("Help%3APage")
        );
    }
}
