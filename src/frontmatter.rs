//! YAML frontmatter for the generated Markdown files.
//!
//! The schema is fixed so static-site generators (Hugo, Zola) can index the
//! notes folder directly:
//!
//! ```text
//! ---
//! title: '<title>'
//! author: '<author>'
//! date: '<YYYY-MM-DD>'
//! slug: <slug>            (only when set)
//! toc: true
//! top_level: <bool>
//! categories:
//!   -
//! tags:
//!   -
//! keys:                   (only when non-empty)
//!   - <key>
//! ---
//! ```
//!
//! No newline follows the closing `---`; callers decide what comes next.

use chrono::NaiveDate;

/// A frontmatter block under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    title: String,
    author: String,
    date: NaiveDate,
    slug: Option<String>,
    keys: Vec<String>,
    top_level: bool,
}

impl Frontmatter {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            author: String::new(),
            date,
            slug: None,
            keys: Vec::new(),
            top_level: false,
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        self.slug = if slug.is_empty() { None } else { Some(slug) };
        self
    }

    pub fn keys(mut self, keys: Vec<String>) -> Self {
        self.keys = keys;
        self
    }

    /// Marks a document's `_index.md`, the entry page of its folder.
    pub fn top_level(mut self, v: bool) -> Self {
        self.top_level = v;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        out.push_str(&format!("title: '{}'\n", quote(&self.title)));
        out.push_str(&format!("author: '{}'\n", quote(&self.author)));
        out.push_str(&format!("date: '{}'\n", self.date.format("%Y-%m-%d")));
        if let Some(slug) = &self.slug {
            out.push_str(&format!("slug: {}\n", slug));
        }
        out.push_str("toc: true\n");
        out.push_str(&format!("top_level: {}\n", self.top_level));
        out.push_str("categories:\n  - \n");
        out.push_str("tags:\n  - \n");
        if !self.keys.is_empty() {
            out.push_str("keys:\n");
            for key in &self.keys {
                out.push_str(&format!("  - {}\n", key));
            }
        }
        out.push_str("---");
        out
    }
}

/// Escape a value for a single-quoted YAML scalar.
fn quote(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn minimal_block() {
        let fm = Frontmatter::new("Notes - 20240309-101500", day()).author("A. Writer");
        assert_eq!(
            fm.render(),
            "---\n\
title: 'Notes - 20240309-101500'\n\
author: 'A. Writer'\n\
date: '2024-03-09'\n\
toc: true\n\
top_level: false\n\
categories:\n  - \n\
tags:\n  - \n\
---"
        );
    }

    #[test]
    fn slug_and_keys_in_place() {
        let fm = Frontmatter::new("Paper", day())
            .slug("paper")
            .keys(vec!["rust".into(), "pdf".into()])
            .top_level(true);
        let out = fm.render();
        assert!(out.contains("date: '2024-03-09'\nslug: paper\ntoc: true\ntop_level: true\n"));
        assert!(out.ends_with("tags:\n  - \nkeys:\n  - rust\n  - pdf\n---"), "got: {out}");
    }

    #[test]
    fn empty_slug_is_omitted() {
        let out = Frontmatter::new("t", day()).slug("").render();
        assert!(!out.contains("slug:"));
    }

    #[test]
    fn single_quotes_are_doubled() {
        let out = Frontmatter::new("Reader's Guide", day())
            .author("O'Brien")
            .render();
        assert!(out.contains("title: 'Reader''s Guide'\n"));
        assert!(out.contains("author: 'O''Brien'\n"));
    }
}
