//! Centralized filename parsing for the `locale:Segment:Segment.md` convention.
//!
//! Wiki pages are flat files whose names encode their place in the menu:
//!
//! ```text
//! en:Help.md                        → locale "en", segments ["Help"]
//! en:Help:Categ-page:Item-page-1.md → locale "en", segments ["Help", "Categ-page", "Item-page-1"]
//! fr_ca:Help:Page.md                → locale "fr_ca" (underscores stay in the locale)
//! Help:Page.md                      → single-language mode, segments ["Help", "Page"]
//! ```
//!
//! ## Display Titles
//!
//! Dashes in a segment are converted to spaces for display:
//! `Landing-Some-Page` → "Landing Some Page".

use crate::config::{ConfigError, WikiConfig};
use regex::Regex;

/// Leading locale token: a lowercase letter followed by letters or underscores.
pub const LOCALE_PATTERN: &str = "^([a-z][a-zA-Z_]+)";

pub const MARKDOWN_EXTENSION: &str = ".md";
pub const HTML_EXTENSION: &str = ".html";

/// Result of parsing a wiki filename like `en:Help:Categ-page:Item-page-1.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Locale token, only in multi-language mode.
    pub locale: Option<String>,
    /// Menu path below the locale. Never empty, no empty segments.
    pub segments: Vec<String>,
    /// Filename without the `.md` extension, locale included.
    pub canonical_key: String,
}

/// Splits and filters wiki filenames according to the configured separator.
#[derive(Debug, Clone)]
pub struct FilenameParser {
    separator: String,
    multilang: bool,
    locale_prefix: Regex,
    filter: Regex,
}

impl FilenameParser {
    /// Build a parser.
    ///
    /// `filter_override` replaces the default filter, which accepts
    /// `[<locale><sep>]<prefix>*.md`.
    pub fn new(
        separator: &str,
        multilang: bool,
        prefix: &str,
        filter_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let locale_prefix = compile(&format!(
            "{LOCALE_PATTERN}{}",
            regex::escape(separator)
        ))?;

        let filter_source = match filter_override {
            Some(rule) => rule.to_string(),
            None => default_filter(separator, multilang, prefix),
        };
        let filter = compile(&filter_source)?;

        Ok(Self {
            separator: separator.to_string(),
            multilang,
            locale_prefix,
            filter,
        })
    }

    pub fn from_config(config: &WikiConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.separator,
            config.multilang,
            &config.prefix_files,
            config.files_filter_rule.as_deref(),
        )
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn is_multilang(&self) -> bool {
        self.multilang
    }

    /// Source regex of the active filename filter.
    pub fn filter_pattern(&self) -> &str {
        self.filter.as_str()
    }

    /// Whether `name` belongs to the published wiki.
    pub fn matches(&self, name: &str) -> bool {
        self.filter.is_match(name)
    }

    /// Remove a leading `<locale><sep>` in multi-language mode.
    pub fn strip_locale<'a>(&self, name: &'a str) -> &'a str {
        if !self.multilang {
            return name;
        }
        match self.locale_prefix.find(name) {
            Some(m) => &name[m.end()..],
            None => name,
        }
    }

    /// Parse a filename into locale, segments and canonical key.
    ///
    /// Returns `None` when nothing is left after stripping the extension
    /// and locale.
    pub fn parse(&self, name: &str) -> Option<ParsedName> {
        let canonical_key = canonical_key(name);

        let (locale, rest) = match self.locale_prefix.captures(canonical_key) {
            Some(caps) if self.multilang => {
                let whole = caps.get(0)?;
                let locale = caps.get(1)?.as_str().to_string();
                (Some(locale), &canonical_key[whole.end()..])
            }
            _ => (None, canonical_key),
        };

        let segments = split_segments(rest, &self.separator);
        if segments.is_empty() {
            return None;
        }

        Some(ParsedName {
            locale,
            segments,
            canonical_key: canonical_key.to_string(),
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// `^([a-z][a-zA-Z_]+):Help.*\.md$` for the default options.
fn default_filter(separator: &str, multilang: bool, prefix: &str) -> String {
    let locale = if multilang {
        format!("{LOCALE_PATTERN}{}", regex::escape(separator))
    } else {
        "^".to_string()
    };
    format!("{locale}{}.*\\.md$", regex::escape(prefix))
}

/// Split on `separator`, dropping empty segments.
pub fn split_segments(path: &str, separator: &str) -> Vec<String> {
    path.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Filename with a trailing `.md` removed.
pub fn canonical_key(name: &str) -> &str {
    name.strip_suffix(MARKDOWN_EXTENSION).unwrap_or(name)
}

/// Output name for a page: `en:Help.md` → `en:Help.html`.
pub fn html_name(name: &str) -> String {
    format!("{}{HTML_EXTENSION}", canonical_key(name))
}

/// Display title for a segment: dashes become spaces, outer whitespace trimmed.
pub fn humanize(segment: &str) -> String {
    segment.replace('-', " ").trim().to_string()
}
