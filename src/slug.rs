//! Filesystem- and URL-safe slugs, Django style.
//!
//! `"My Paper (2nd ed.)"` → `"my-paper-2nd-ed"`. Unicode word characters are
//! kept as they are; only punctuation and symbols are dropped.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

static RE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Slugify `text`.
///
/// 1. lowercase
/// 2. drop every character that is not a word character, whitespace or `-`
/// 3. collapse runs of `-` and whitespace into a single `-`
/// 4. strip leading and trailing `-` and `_`
///
/// May return an empty string (e.g. for `"!!!"`).
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let kept = RE_DISALLOWED.replace_all(&lower, "");
    let joined = RE_SEPARATORS.replace_all(&kept, "-");
    joined.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_and_punctuation() {
        assert_eq!(slugify("My Paper (2nd ed.)"), "my-paper-2nd-ed");
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn runs_collapse() {
        assert_eq!(slugify("a  -  b--c"), "a-b-c");
        assert_eq!(slugify("tab\tand\nnewline"), "tab-and-newline");
    }

    #[test]
    fn edges_are_stripped() {
        assert_eq!(slugify("  _leading and trailing_ - "), "leading-and-trailing");
        assert_eq!(slugify("--x--"), "x");
    }

    #[test]
    fn inner_underscores_survive() {
        assert_eq!(slugify("snake_case name"), "snake_case-name");
    }

    #[test]
    fn unicode_word_chars_kept() {
        assert_eq!(slugify("Über Straße"), "über-straße");
    }

    #[test]
    fn nothing_left() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }
}
