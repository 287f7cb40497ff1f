//! Menu rendering through configurable templates.
//!
//! Each node renders through one template:
//!
//! | Node | Template |
//! |------|----------|
//! | [`MenuNode::Item`] | `item` |
//! | [`MenuNode::Category`] at level N | `category-N`, else `category` |
//!
//! Templates see `title` (segment with dashes as spaces), `link` (locale
//! stripped, passed through the link template), `level` and `subitems` (the
//! concatenated markup of the children, use `{{{subitems}}}` to keep it
//! unescaped). A category with its own page exposes that page as `link`;
//! no separate anchor is generated for it.
//!
//! Templates are written in Mustache and compiled with
//! [handlebars](https://docs.rs/handlebars). Variables (`{{x}}`, `{{{x}}}`)
//! share the syntax. Mustache sections are supported on top:
//!
//! | Tag | Renders its block when |
//! |-----|------------------------|
//! | `{{#link}}…{{/link}}` | `link` is set and non-empty |
//! | `{{^link}}…{{/link}}` | `link` is missing or empty |
//!
//! Partials and lambdas are not supported.

use crate::config::{ConfigError, MenuTemplates, WikiConfig};
use crate::menu::MenuNode;
use crate::naming::{LOCALE_PATTERN, humanize};
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy, Output, RenderContext,
    Renderable,
};
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

/// Opening, inverted and closing section tags: `{{#x}}`, `{{^x}}`, `{{/x}}`.
static SECTION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([#^/])\s*([^\s}]+)[^}]*\}\}").expect("section tag pattern is valid")
});

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("No `{0}` menu template configured")]
    MissingTemplate(String),
    #[error("Menu template render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Which family of template a node renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Item,
    Category,
}

#[derive(Serialize)]
struct EntryContext<'a> {
    title: String,
    link: String,
    subitems: &'a str,
    level: usize,
}

/// Renders menu trees with a compiled template set.
pub struct MenuRenderer {
    registry: Handlebars<'static>,
    link_template: String,
    /// `^<locale><hash separator>`, only in multi-language mode.
    locale_link: Option<Regex>,
}

impl MenuRenderer {
    /// Compile `templates`. A malformed template is a configuration error.
    pub fn new(
        templates: &MenuTemplates,
        link_template: &str,
        hash_separator: &str,
        multilang: bool,
    ) -> Result<Self, ConfigError> {
        let mut registry = Handlebars::new();
        registry.register_helper("blockHelperMissing", Box::new(MustacheSection));
        for (name, template) in templates.iter() {
            registry
                .register_template_string(name, inverted_sections(template))
                .map_err(|source| ConfigError::Template {
                    name: name.to_string(),
                    source: Box::new(source),
                })?;
        }

        let locale_link = if multilang {
            let pattern = format!("{LOCALE_PATTERN}{}", regex::escape(hash_separator));
            Some(
                Regex::new(&pattern)
                    .map_err(|source| ConfigError::Pattern { pattern, source })?,
            )
        } else {
            None
        };

        Ok(Self {
            registry,
            link_template: link_template.to_string(),
            locale_link,
        })
    }

    pub fn from_config(config: &WikiConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.menu_templates,
            &config.link_template,
            &config.effective_hash_separator(),
            config.multilang,
        )
    }

    /// Render `node` (named `key`) and everything below it.
    ///
    /// An absent node or an empty category renders as an empty string.
    pub fn get_menu(
        &self,
        node: Option<&MenuNode>,
        key: &str,
        level: usize,
    ) -> Result<String, MenuError> {
        let Some(node) = node else {
            return Ok(String::new());
        };

        match node {
            MenuNode::Item { link } => self.render_entry(EntryKind::Item, key, link, "", level),
            MenuNode::Category { children, .. } if children.is_empty() => Ok(String::new()),
            MenuNode::Category { link, children } => {
                let mut subitems = String::new();
                for (child_key, child) in children.iter() {
                    subitems.push_str(&self.get_menu(Some(child), child_key, level + 1)?);
                }
                self.render_entry(
                    EntryKind::Category,
                    key,
                    link.as_deref().unwrap_or_default(),
                    &subitems,
                    level,
                )
            }
        }
    }

    /// Render a single entry with the template matching `kind` and `level`.
    pub fn render_entry(
        &self,
        kind: EntryKind,
        key: &str,
        link: &str,
        subitems: &str,
        level: usize,
    ) -> Result<String, MenuError> {
        let template = self.template_name(kind, level)?;
        let context = EntryContext {
            title: humanize(key),
            link: self.format_link(link),
            subitems,
            level,
        };
        Ok(self.registry.render(&template, &context)?)
    }

    /// Strip the locale (multi-language mode) and apply the link template.
    ///
    /// The first `%s` receives the link; a template without `%s` gets the
    /// link appended after a space.
    pub fn format_link(&self, link: &str) -> String {
        let link = match &self.locale_link {
            Some(re) => re.replace(link, ""),
            None => link.into(),
        };
        if self.link_template.contains("%s") {
            self.link_template.replacen("%s", &link, 1)
        } else {
            format!("{} {}", self.link_template, link)
        }
    }

    fn template_name(&self, kind: EntryKind, level: usize) -> Result<String, MenuError> {
        let name = match kind {
            EntryKind::Item => "item".to_string(),
            EntryKind::Category => {
                let leveled = format!("category-{level}");
                if self.registry.has_template(&leveled) {
                    leveled
                } else {
                    "category".to_string()
                }
            }
        };
        if self.registry.has_template(&name) {
            Ok(name)
        } else {
            Err(MenuError::MissingTemplate(name))
        }
    }
}

/// `{{#name}}` with no helper of that name: a Mustache section over the
/// context value `name`.
struct MustacheSection;

impl HelperDef for MustacheSection {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        registry: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let truthy = match h.param(0) {
            Some(param) => param.value().is_truthy(false),
            None => ctx
                .data()
                .get(h.name())
                .is_some_and(|value| value.is_truthy(false)),
        };
        let block = if truthy { h.template() } else { h.inverse() };
        match block {
            Some(template) => template.render(registry, ctx, rc, out),
            None => Ok(()),
        }
    }
}

/// Rewrite Mustache inverted sections `{{^name}}…{{/name}}` as
/// `{{#unless name}}…{{/unless}}`. Every other tag is left as is.
fn inverted_sections(template: &str) -> String {
    let mut open = Vec::new();
    SECTION_TAG
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "#" => {
                open.push(false);
                caps[0].to_string()
            }
            "^" => {
                open.push(true);
                format!("{{{{#unless {}}}}}", &caps[2])
            }
            _ => {
                if open.pop() == Some(true) {
                    "{{/unless}}".to_string()
                } else {
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
