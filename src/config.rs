//! Wiki configuration module.
//!
//! Handles loading, validating, and merging `wiki.toml`. Stock defaults are
//! overridden by an optional `wiki.toml` in the wiki source directory, or by
//! an explicit file passed on the command line.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! separator = ":"               # Splits filenames into menu levels
//! # hash_separator = "%3A"      # Separator used inside menu links (default: URL-encoded separator)
//! multilang = true              # Filenames start with a locale (`en:`, `fr_ca:`)
//! prefix_files = "Help"         # Only pages under this root segment are published
//! # files_filter_rule = "..."   # Regex replacing the default filename filter
//! link_template = "./#/%s"      # `%s` is replaced by the page link
//! menu_file = "_menu_.html"     # Menu document name (prefixed by `<locale><separator>`)
//! default_language = "en"       # Source language for the translation table
//!
//! [rules]
//! pre = [{ "^# (.*)$" = "# $1" }]   # Applied to markdown before rendering
//! post = [{ "<table>" = "<table class=\"grid\">" }]   # Applied to rendered HTML
//! order = ["Help:Getting-Started"] # Menu priority, locale-free, first wins
//!
//! [menu_templates]
//! item = '<li><a href="{{link}}">{{title}}</a></li>'
//! category = '<li><span>{{title}}</span><ul>{{{subitems}}}</ul></li>'
//! category-1 = '<ul>{{{subitems}}}</ul>'
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the wiki source directory.
pub const CONFIG_FILE_NAME: &str = "wiki.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid menu template `{name}`: {source}")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Wiki configuration loaded from `wiki.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WikiConfig {
    /// Splits a filename into locale and menu segments.
    pub separator: String,
    /// Separator written into menu links. Defaults to the URL-encoded separator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_separator: Option<String>,
    /// Whether filenames carry a leading locale segment.
    pub multilang: bool,
    /// Required root segment (after the locale). Empty disables the prefix.
    pub prefix_files: String,
    /// Regex replacing the filename filter derived from the options above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_filter_rule: Option<String>,
    /// Link format; the first `%s` receives the page link.
    pub link_template: String,
    /// Menu document file name.
    pub menu_file: String,
    /// Language whose segment titles seed the translation table.
    pub default_language: String,
    pub rules: RulesConfig,
    pub menu_templates: MenuTemplates,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            separator: ":".to_string(),
            hash_separator: None,
            multilang: true,
            prefix_files: "Help".to_string(),
            files_filter_rule: None,
            link_template: "./#/%s".to_string(),
            menu_file: "_menu_.html".to_string(),
            default_language: "en".to_string(),
            rules: RulesConfig::default(),
            menu_templates: MenuTemplates::default(),
        }
    }
}

/// Characters `encodeURIComponent` leaves alone: A-Z a-z 0-9 - _ . ! ~ * ' ( )
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

impl WikiConfig {
    /// The separator written into menu links.
    ///
    /// `:` becomes `%3A` unless `hash_separator` is set explicitly.
    pub fn effective_hash_separator(&self) -> String {
        match &self.hash_separator {
            Some(sep) => sep.clone(),
            None => utf8_percent_encode(&self.separator, URI_COMPONENT).to_string(),
        }
    }

    /// Validate values that don't need regex or template compilation.
    ///
    /// Patterns and templates are compiled (and rejected) when the
    /// transform is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::Validation(
                "separator must not be empty".into(),
            ));
        }
        if self.hash_separator.as_deref() == Some("") {
            return Err(ConfigError::Validation(
                "hash_separator must not be empty".into(),
            ));
        }
        if self.menu_file.is_empty() {
            return Err(ConfigError::Validation(
                "menu_file must not be empty".into(),
            ));
        }
        if self.prefix_files.contains(&self.separator) {
            return Err(ConfigError::Validation(format!(
                "prefix_files must be a single segment (contains `{}`)",
                self.separator
            )));
        }
        for required in ["item", "category"] {
            if self.menu_templates.get(required).is_none() {
                return Err(ConfigError::Validation(format!(
                    "menu template `{required}` must not be empty"
                )));
            }
        }
        for name in self.menu_templates.0.keys() {
            if !is_template_key(name) {
                return Err(ConfigError::Validation(format!(
                    "unknown menu template `{name}` (expected item, category or category-<level>)"
                )));
            }
        }
        Ok(())
    }
}

fn is_template_key(name: &str) -> bool {
    match name {
        "item" | "category" => true,
        _ => name
            .strip_prefix("category-")
            .is_some_and(|level| level.parse::<usize>().is_ok()),
    }
}

/// Text substitution and ordering rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Applied to the raw markdown before rendering.
    pub pre: Vec<Rule>,
    /// Applied to the rendered HTML.
    pub post: Vec<Rule>,
    /// Locale-free page keys that float to the top of the menu, first wins.
    pub order: Vec<String>,
}

/// A single `pattern = replacement` substitution.
///
/// Serialized as a one-entry table so rule lists read like the wiki's own
/// option files: `pre = [{ "<h([1-3])" = "<h$1 class=\"title\"" }]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

impl TryFrom<BTreeMap<String, String>> for Rule {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "a rule must have exactly one `pattern = replacement` entry, found {}",
                map.len()
            ));
        }
        let (pattern, replacement) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty rule".to_string())?;
        Ok(Rule {
            pattern,
            replacement,
        })
    }
}

impl From<Rule> for BTreeMap<String, String> {
    fn from(rule: Rule) -> Self {
        BTreeMap::from([(rule.pattern, rule.replacement)])
    }
}

/// Menu templates keyed by `item`, `category` or `category-<level>`.
///
/// User tables merge key by key over the defaults; an empty string removes
/// a default template (e.g. `category-1 = ""` to render the top level with
/// the generic `category` template).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuTemplates(pub BTreeMap<String, String>);

impl MenuTemplates {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|tpl| !tpl.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, tpl)| !tpl.is_empty())
            .map(|(name, tpl)| (name.as_str(), tpl.as_str()))
    }
}

impl Default for MenuTemplates {
    fn default() -> Self {
        Self(BTreeMap::from([
            (
                "item".to_string(),
                r#"<li><a href="{{link}}">{{title}}</a></li>"#.to_string(),
            ),
            (
                "category".to_string(),
                "<li><span>{{title}}</span><ul>{{{subitems}}}</ul></li>".to_string(),
            ),
            (
                "category-1".to_string(),
                "<ul>{{{subitems}}}</ul>".to_string(),
            ),
        ]))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MenuTemplates {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, tpl)| (name.to_string(), tpl.to_string()))
                .collect(),
        )
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(WikiConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including rule arrays) replace base values.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<WikiConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: WikiConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `wiki.toml` from the wiki source directory (defaults if absent).
pub fn load_config(source_dir: &Path) -> Result<WikiConfig, ConfigError> {
    load_config_file(&source_dir.join(CONFIG_FILE_NAME))
}

/// Load an explicit config file (defaults if absent).
pub fn load_config_file(path: &Path) -> Result<WikiConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `wiki.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# wiki2html Configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Place this file as wiki.toml in the wiki directory, or pass --config.
# Unknown keys will cause an error.

# Separator between filename segments: en:Help:Category:Page.md
separator = ":"

# Separator written into menu links. Defaults to the URL-encoded separator.
# hash_separator = "%3A"

# Filenames start with a locale segment (en, fr_ca, ...). One menu is
# generated per locale.
multilang = true

# Only pages below this root segment are published. Set to "" to publish
# every markdown page.
prefix_files = "Help"

# Regex replacing the filter built from the options above.
# files_filter_rule = "^([a-z][a-zA-Z_]+):Help.*\\.md$"

# Menu link format. The first %s receives the page link.
link_template = "./#/%s"

# Menu document name. In multilang mode it is written as <locale><separator><menu_file>.
menu_file = "_menu_.html"

# Language used to seed the translation table.
default_language = "en"

# ---------------------------------------------------------------------------
# Rules
# ---------------------------------------------------------------------------
# Each rule is a one-entry table: { "regex" = "replacement" }.
# Rules run in order, multi-line, replacing every match. Use $1, $2 for groups.
[rules]
# Applied to the markdown source before rendering.
pre = []
# Applied to the rendered HTML.
post = []
# Locale-free page keys listed first in the menu, in this order.
# Remaining pages are listed in descending name order.
order = []

# ---------------------------------------------------------------------------
# Menu templates
# ---------------------------------------------------------------------------
# Placeholders: {{title}}, {{link}}, {{level}}, {{{subitems}}} (unescaped).
# Sections: {{#link}}...{{/link}} renders only when the value is set,
# {{^link}}...{{/link}} only when it is not.
# A category at nesting level N uses category-N when present, else category.
# item and category are required; set category-1 = "" to drop the default.
[menu_templates]
item = '<li><a href="{{link}}">{{title}}</a></li>'
category = '<li><span>{{title}}</span><ul>{{{subitems}}}</ul></li>'
category-1 = '<ul>{{{subitems}}}</ul>'
"##
}
