//! Markdown rendering.
//!
//! The transform only needs a `&str → String` function; [`MarkdownRenderer`]
//! is that seam. [`CmarkRenderer`] is the production implementation on top of
//! pulldown-cmark. It also gives every heading an `id` so wiki pages can link
//! to sections (`# Title for the page` → `<h1 id="title-for-the-page">`).

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use std::collections::HashMap;

/// Renders markdown to HTML. Must be `Sync` so pages can render in parallel.
pub trait MarkdownRenderer: Sync {
    fn render(&self, markdown: &str) -> String;
}

/// pulldown-cmark renderer with tables, strikethrough and footnotes enabled.
#[derive(Debug, Clone, Copy)]
pub struct CmarkRenderer {
    options: Options,
    heading_ids: bool,
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES,
            heading_ids: true,
        }
    }
}

impl CmarkRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_heading_ids(self) -> Self {
        Self {
            heading_ids: false,
            ..self
        }
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        if self.heading_ids {
            let mut seen = HashMap::new();
            for i in 0..events.len() {
                if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
                    continue;
                }
                let slug = unique_slug(&heading_text(&events[i + 1..]), &mut seen);
                if slug.is_empty() {
                    continue;
                }
                if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                    *id = Some(CowStr::from(slug));
                }
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

/// Plain text of a heading, up to its closing tag.
fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Lowercase, alphanumerics kept, runs of anything else become one dash.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn unique_slug(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let base = slugify(text);
    if base.is_empty() {
        return base;
    }
    let count = seen.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 {
        base
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    slug
}
