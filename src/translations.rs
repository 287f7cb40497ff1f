//! Translation table for menu titles.
//!
//! Every language found in the wiki gets the same table: the display titles
//! of the default language's segments, each mapped to itself. Translators
//! fill in the values; the keys are what the menu shows for the default
//! language. A single-language wiki has one table, under the default
//! language.
//!
//! ```json
//! {
//!   "en":    { "Categ page": "Categ page", "Help": "Help" },
//!   "fr_ca": { "Categ page": "Categ page", "Help": "Help" }
//! }
//! ```

use crate::naming::{FilenameParser, humanize};
use std::collections::BTreeMap;

pub type TranslationTable = BTreeMap<String, BTreeMap<String, String>>;

/// Build the table from wiki filenames. In multi-language mode a name's
/// locale is its language and names without one are skipped.
pub fn translation_table<S: AsRef<str>>(
    files: &[S],
    parser: &FilenameParser,
    default_language: &str,
) -> TranslationTable {
    let mut languages = Vec::new();
    let mut titles = BTreeMap::new();

    for name in files {
        let Some(parsed) = parser.parse(name.as_ref()) else {
            continue;
        };
        let language = match parsed.locale {
            Some(locale) => locale,
            None if parser.is_multilang() => continue,
            None => default_language.to_string(),
        };

        if language == default_language {
            for segment in &parsed.segments {
                let title = humanize(segment);
                titles.entry(title.clone()).or_insert(title);
            }
        }

        if !languages.contains(&language) {
            languages.push(language);
        }
    }

    languages
        .into_iter()
        .map(|language| (language, titles.clone()))
        .collect()
}
