//! Reading-order text assembly: an unordered word set → one flat string.
//!
//! Words are pre-sorted by their left edge, bucketed into lines by rounded
//! bottom edge, lines are read top to bottom and words left to right. The
//! result is a single line of text (no embedded newlines) suitable for a
//! Markdown blockquote.

use crate::model::Word;
use crate::pipeline::word_index::OrderedWordIndex;

/// Render `words` in natural reading order.
///
/// Empty input yields an empty string.
pub fn make_text<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut by_x: Vec<&Word> = words.into_iter().collect();
    if by_x.is_empty() {
        return String::new();
    }
    // Stable, so words with equal x0 keep their page order.
    by_x.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let mut index = OrderedWordIndex::with_capacity(by_x.len());
    for w in by_x {
        index.insert_right(w.clone());
    }

    let lines: Vec<String> = index.lines().map(|line| line.text()).collect();
    lines.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    fn word(text: &str, x0: f64, y1: f64) -> Word {
        Word::new(text, Rect::new(x0, y1 - 8.0, x0 + 4.0, y1), 0, 0)
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(make_text(&Vec::<Word>::new()), "");
    }

    #[test]
    fn single_line_left_to_right() {
        let words = [word("world", 5.0, 10.04), word("Hello", 0.0, 10.04)];
        assert_eq!(make_text(&words), "Hello world");
    }

    #[test]
    fn lines_top_to_bottom_joined_by_space() {
        let words = [
            word("line.", 40.0, 30.0),
            word("second", 0.0, 30.0),
            word("the", 20.0, 10.0),
            word("first", 0.0, 10.0),
            word("is", 10.0, 30.02),
        ];
        assert_eq!(make_text(&words), "first the second is line.");
    }

    #[test]
    fn small_baseline_jitter_stays_on_one_line() {
        let words = [word("a", 0.0, 10.01), word("b", 5.0, 9.99), word("c", 9.0, 10.04)];
        assert_eq!(make_text(&words), "a b c");
    }

    #[test]
    fn equal_x0_keeps_encounter_order() {
        let words = [word("one", 0.0, 10.0), word("two", 0.0, 10.0)];
        assert_eq!(make_text(&words), "one two");
    }

    #[test]
    fn assembling_twice_is_identical() {
        let words = vec![
            word("z", 9.0, 50.0),
            word("y", 1.0, 50.0),
            word("x", 3.0, 12.0),
        ];
        let first = make_text(&words);
        let second = make_text(&words);
        assert_eq!(first, second);
        assert_eq!(first, "x y z");
    }
}
