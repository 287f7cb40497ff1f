//! Wiki → HTML transform.
//!
//! Runs in two phases:
//!
//! ```text
//! 1. Pages   en:Help:Page.md  →  pre rules → markdown → post rules →  en:Help:Page.html
//! 2. Menus   all page names   →  ordered tree → templates            →  en:_menu_.html
//! ```
//!
//! Pages are transformed in parallel with [rayon](https://docs.rs/rayon).
//! Menus are rendered before the first page is written, so a broken menu
//! template fails the run without output, and written only once every page
//! has been written. The first failing page aborts the run (pages already
//! written stay on disk).
//!
//! Recorded output names follow the source order, not completion order.

use crate::config::{ConfigError, WikiConfig};
use crate::markdown::{CmarkRenderer, MarkdownRenderer};
use crate::menu::{MenuNode, MenuTreeBuilder};
use crate::naming::{FilenameParser, html_name};
use crate::ordering::order_files;
use crate::render::{MenuError, MenuRenderer};
use crate::rules::RuleSet;
use crate::storage::{FsStorage, WikiStorage};
use crate::translations::{TranslationTable, translation_table};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Invalid SRC/DEST folder options")]
    InvalidDirectories,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Menu(#[from] MenuError),
}

/// A rendered menu ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDocument {
    /// Locale the menu belongs to, `None` in single-language mode.
    pub locale: Option<String>,
    pub file_name: String,
    pub markup: String,
}

/// What a transform produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Written page names, in source order.
    pub pages: Vec<String>,
    /// Written menu file names.
    pub menus: Vec<String>,
}

/// Transforms a wiki directory into HTML pages and menus.
pub struct WikiToHtml<S = FsStorage, M = CmarkRenderer> {
    src_dir: PathBuf,
    dest_dir: PathBuf,
    config: WikiConfig,
    hash_separator: String,
    parser: FilenameParser,
    pre_rules: RuleSet,
    post_rules: RuleSet,
    menu_renderer: MenuRenderer,
    storage: S,
    markdown: M,
    src_files: Vec<String>,
    res_files: Vec<String>,
}

impl WikiToHtml {
    /// Transform on the local filesystem with the pulldown-cmark renderer.
    pub fn new(
        src_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
        config: WikiConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_collaborators(src_dir, dest_dir, config, FsStorage, CmarkRenderer::new())
    }
}

impl<S: WikiStorage, M: MarkdownRenderer> WikiToHtml<S, M> {
    /// Compile every pattern and template in `config` up front.
    pub fn with_collaborators(
        src_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
        config: WikiConfig,
        storage: S,
        markdown: M,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let parser = FilenameParser::from_config(&config)?;
        let pre_rules = RuleSet::compile(&config.rules.pre)?;
        let post_rules = RuleSet::compile(&config.rules.post)?;
        let menu_renderer = MenuRenderer::from_config(&config)?;

        Ok(Self {
            src_dir: src_dir.into(),
            dest_dir: dest_dir.into(),
            hash_separator: config.effective_hash_separator(),
            config,
            parser,
            pre_rules,
            post_rules,
            menu_renderer,
            storage,
            markdown,
            src_files: Vec::new(),
            res_files: Vec::new(),
        })
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Source files found by the last [`load_files`](Self::load_files).
    pub fn src_files(&self) -> &[String] {
        &self.src_files
    }

    /// Preset the source list; [`load_files`](Self::load_files) will not list the directory.
    pub fn set_src_files(&mut self, files: Vec<String>) {
        self.src_files = files;
    }

    /// Pages written so far, in source order.
    pub fn res_files(&self) -> &[String] {
        &self.res_files
    }

    /// Both source and destination must be existing directories.
    pub fn valid_configuration(&self) -> bool {
        if !self.storage.is_dir(&self.src_dir) {
            debug!(src = %self.src_dir.display(), "invalid source folder");
            return false;
        }
        if !self.storage.is_dir(&self.dest_dir) {
            debug!(dest = %self.dest_dir.display(), "invalid output folder");
            return false;
        }
        true
    }

    /// List the wiki pages in the source directory, sorted by name.
    ///
    /// The list is cached: once loaded (or preset), the directory is not
    /// listed again.
    pub fn load_files(&mut self) -> Result<&[String], TransformError> {
        if !self.src_files.is_empty() {
            debug!(count = self.src_files.len(), "source files already loaded");
            return Ok(&self.src_files);
        }

        let mut files: Vec<String> = self
            .storage
            .list(&self.src_dir)?
            .into_iter()
            .filter(|name| self.parser.matches(name))
            .collect();
        files.sort();
        debug!(count = files.len(), "source files loaded");

        self.src_files = files;
        Ok(&self.src_files)
    }

    /// Pre rules → markdown → post rules.
    pub fn parse(&self, content: &str) -> String {
        let content = self.pre_rules.apply(content);
        let content = self.markdown.render(&content);
        self.post_rules.apply(&content)
    }

    /// Write `content` to `name` in the destination directory.
    pub fn write_file(&self, name: &str, content: &str) -> std::io::Result<()> {
        let path = self.dest_dir.join(name);
        self.storage.write(&path, content)?;
        debug!(file = %path.display(), "file generated");
        Ok(())
    }

    /// Read, transform and write one page. Returns the written name.
    fn transform_file(&self, name: &str) -> Result<String, TransformError> {
        let content = self.storage.read(&self.src_dir.join(name))?;
        let html = self.parse(&content);
        let output = html_name(name);
        self.write_file(&output, &html)?;
        Ok(output)
    }

    /// Order `files` by the configured priority and fold them into a tree.
    pub fn build_menu_tree<T: AsRef<str>>(&self, files: &[T]) -> MenuNode {
        let names: Vec<String> = files.iter().map(|f| f.as_ref().to_string()).collect();
        let ordered = order_files(&names, &self.config.rules.order, &self.parser);
        MenuTreeBuilder::new(&self.parser, &self.hash_separator).build(&ordered)
    }

    /// Render a menu subtree as a top-level (level 1) menu.
    pub fn get_menu(&self, node: Option<&MenuNode>) -> Result<String, MenuError> {
        self.menu_renderer.get_menu(node, "", 1)
    }

    pub fn menu_renderer(&self) -> &MenuRenderer {
        &self.menu_renderer
    }

    /// The subtree a menu is rendered from: below the required prefix, if any.
    fn menu_root<'a>(&self, node: &'a MenuNode) -> Option<&'a MenuNode> {
        if self.config.prefix_files.is_empty() {
            Some(node)
        } else {
            node.child(&self.config.prefix_files)
        }
    }

    /// Render one menu per locale (or a single menu in single-language mode).
    ///
    /// An empty tree yields no menus.
    pub fn menu_documents(&self, tree: &MenuNode) -> Result<Vec<MenuDocument>, MenuError> {
        if tree.is_empty() {
            return Ok(Vec::new());
        }

        if !self.config.multilang {
            return Ok(vec![MenuDocument {
                locale: None,
                file_name: self.config.menu_file.clone(),
                markup: self.get_menu(self.menu_root(tree))?,
            }]);
        }

        let Some(locales) = tree.children() else {
            return Ok(Vec::new());
        };
        locales
            .iter()
            .map(|(locale, node)| -> Result<MenuDocument, MenuError> {
                Ok(MenuDocument {
                    locale: Some(locale.to_string()),
                    file_name: format!(
                        "{locale}{}{}",
                        self.config.separator, self.config.menu_file
                    ),
                    markup: self.get_menu(self.menu_root(node))?,
                })
            })
            .collect()
    }

    /// Translation table for the loaded source files.
    pub fn translation_table(&self) -> TranslationTable {
        translation_table(
            &self.src_files,
            &self.parser,
            &self.config.default_language,
        )
    }

    /// Transform every page, then write the menus.
    pub fn transform(&mut self) -> Result<TransformReport, TransformError> {
        debug!("transform");
        if !self.valid_configuration() {
            return Err(TransformError::InvalidDirectories);
        }

        let files = self.load_files()?.to_vec();

        // Menus depend on names only: render them before any page is written
        let tree = self.build_menu_tree(&files);
        let documents = self.menu_documents(&tree)?;

        info!(count = files.len(), src = %self.src_dir.display(), "transforming pages");
        let pages = files
            .par_iter()
            .map(|name| self.transform_file(name))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("all files written");
        self.res_files.extend(pages.iter().cloned());

        let mut menus = Vec::new();
        for document in documents {
            debug!(file = %document.file_name, "write menu file");
            self.write_file(&document.file_name, &document.markup)?;
            menus.push(document.file_name);
        }
        info!(pages = pages.len(), menus = menus.len(), "transform complete");

        Ok(TransformReport { pages, menus })
    }
}
