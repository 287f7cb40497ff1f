//! # wiki2html
//!
//! Converts a flat git wiki into HTML pages and per-locale navigation menus.
//! Filenames are the data source: a page's name encodes its locale and its
//! place in the menu, so there is no front-matter and no separate index.
//!
//! ```text
//! en:Help:Categ-page:Item-page-1.md
//! └┬┘ └┬─┘ └───┬────┘ └────┬────┘
//! locale root category    page
//! ```
//!
//! # Architecture: Two-Phase Transform
//!
//! ```text
//! 1. Pages   *.md     →  pre rules → markdown → post rules  →  *.html
//! 2. Menus   names    →  priority order → tree → templates  →  <locale>:_menu_.html
//! ```
//!
//! Pages are independent and transform in parallel. Menus depend on every
//! page name and are written once all pages succeeded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`transform`] | Orchestrates both phases: [`transform::WikiToHtml`] |
//! | [`config`] | `wiki.toml` loading, stock defaults, merging and validation |
//! | [`naming`] | Filename filter, locale stripping, segment and title helpers |
//! | [`rules`] | Ordered regex substitutions applied before and after markdown |
//! | [`markdown`] | Markdown → HTML with heading anchors (pulldown-cmark) |
//! | [`ordering`] | Priority list + descending-name menu order |
//! | [`menu`] | Ordered filenames → [`menu::MenuNode`] tree |
//! | [`render`] | Menu tree → HTML through handlebars templates |
//! | [`translations`] | Title table seeded from the default language |
//! | [`storage`] | Filesystem seam used by the transform |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Menu Order Is Name Order
//!
//! Without explicit priorities, siblings appear in descending name order.
//! Wikis that need a specific order list locale-free page keys under
//! `[rules] order`; those float to the top, first listed first, in every
//! locale at once.
//!
//! ## Mustache-Compatible Templates
//!
//! Menu markup comes from user templates rather than compiled-in HTML, since
//! every site embeds its menu differently. Templates are rendered with
//! handlebars, which reads the `{{title}}` / `{{{subitems}}}` syntax existing
//! wiki option files use. Mustache sections work too: `{{#link}}` falls
//! through to a `blockHelperMissing` helper with section semantics, and
//! `{{^link}}` is rewritten to `{{#unless link}}` when templates load.

pub mod config;
pub mod markdown;
pub mod menu;
pub mod naming;
pub mod ordering;
pub mod output;
pub mod render;
pub mod rules;
pub mod storage;
pub mod transform;
pub mod translations;

#[cfg(test)]
pub(crate) mod test_helpers;
