//! Pattern → replacement rules applied around markdown rendering.
//!
//! Rules come from `[rules] pre` and `[rules] post` in `wiki.toml`. Each
//! pattern is compiled once, multi-line, and replaces every match. Rules run
//! in configured order against the already-transformed text, so a later rule
//! sees what an earlier one produced.
//!
//! Replacements are written the way wiki authors write them in JavaScript
//! option files: `$1`..`$99` for groups, `$&` for the whole match, `$<name>`
//! for named groups and `$$` for a literal dollar. They are translated to the
//! `regex` crate syntax at compile time so that `$1abc` means group 1
//! followed by `abc`.

use crate::config::{ConfigError, Rule};
use regex::{Regex, RegexBuilder};

/// A rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    regex: Regex,
    replacement: String,
}

impl CompiledRule {
    pub fn compile(rule: &Rule) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(&rule.pattern)
            .multi_line(true)
            .build()
            .map_err(|source| ConfigError::Pattern {
                pattern: rule.pattern.clone(),
                source,
            })?;
        let names: Vec<&str> = regex.capture_names().flatten().collect();
        let replacement = translate_replacement(&rule.replacement, regex.captures_len(), &names);
        Ok(Self { regex, replacement })
    }

    pub fn apply(&self, content: &str) -> String {
        self.regex
            .replace_all(content, self.replacement.as_str())
            .into_owned()
    }
}

/// An ordered list of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile every rule, failing on the first malformed pattern.
    pub fn compile(rules: &[Rule]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the rules in order. An empty set returns the content unchanged.
    pub fn apply(&self, content: &str) -> String {
        let mut current = content.to_string();
        for rule in &self.rules {
            current = rule.apply(&current);
        }
        current
    }
}

/// Compile and apply `rules` in one go.
pub fn apply_rules(content: &str, rules: &[Rule]) -> Result<String, ConfigError> {
    Ok(RuleSet::compile(rules)?.apply(content))
}

/// Translate a JavaScript-style replacement into `regex` replacement syntax.
///
/// `captures_len` includes the implicit group 0. A two-digit reference is
/// only taken when that group exists, otherwise the second digit is text.
/// `$<name>` stays literal unless `group_names` contains `name`.
fn translate_replacement(replacement: &str, captures_len: usize, group_names: &[&str]) -> String {
    let mut out = String::with_capacity(replacement.len() + 8);
    let chars: Vec<char> = replacement.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '$' {
            out.push(c);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some('$') => {
                out.push_str("$$");
                i += 2;
            }
            Some('&') => {
                out.push_str("${0}");
                i += 2;
            }
            Some(d) if d.is_ascii_digit() => {
                let first = d.to_digit(10).unwrap_or(0) as usize;
                let two_digit = chars
                    .get(i + 2)
                    .and_then(|d2| d2.to_digit(10))
                    .map(|second| first * 10 + second as usize)
                    .filter(|group| *group > 0 && *group < captures_len);
                match two_digit {
                    Some(group) => {
                        out.push_str(&format!("${{{group}}}"));
                        i += 3;
                    }
                    None if first > 0 && first < captures_len => {
                        out.push_str(&format!("${{{first}}}"));
                        i += 2;
                    }
                    // Unknown group: keep the text literally
                    None => {
                        out.push_str("$$");
                        i += 1;
                    }
                }
            }
            Some('<') => {
                let name = chars[i + 2..]
                    .iter()
                    .position(|&ch| ch == '>')
                    .map(|len| chars[i + 2..i + 2 + len].iter().collect::<String>())
                    .filter(|name| group_names.contains(&name.as_str()));
                match name {
                    Some(name) => {
                        out.push_str(&format!("${{{name}}}"));
                        i += name.chars().count() + 3;
                    }
                    None => {
                        out.push_str("$$");
                        i += 1;
                    }
                }
            }
            _ => {
                out.push_str("$$");
                i += 1;
            }
        }
    }

    out
}
