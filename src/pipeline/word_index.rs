//! Ordered word index: page words sorted by `(round(y1, 1), x0)`.
//!
//! Backed by two parallel vectors (keys and words) so the insertion point can
//! be found with a binary search over the keys alone. Locating is O(log n),
//! inserting is O(n) because of the shift. Pages rarely hold more than a few
//! thousand words and the index is rebuilt per page, so the array layout
//! beats a tree in practice.

use crate::model::Word;
use std::cmp::Ordering;

/// Decimal places kept when rounding a word's bottom edge into a line key.
///
/// Words whose `y1` rounds to the same value are treated as one visual line.
/// One decimal is a heuristic tolerance; tune it here if a decoder reports
/// noisier baselines.
pub const LINE_KEY_DECIMALS: i32 = 1;

/// Round a bottom-edge coordinate to its line key.
pub fn line_key(y1: f64) -> f64 {
    let scale = 10f64.powi(LINE_KEY_DECIMALS);
    (y1 * scale).round() / scale
}

/// Composite sort key of a word.
#[derive(Debug, Clone, Copy)]
pub struct WordKey {
    pub line: f64,
    pub x0: f64,
}

impl WordKey {
    pub fn of(word: &Word) -> Self {
        Self {
            line: line_key(word.y1),
            x0: word.x0,
        }
    }
}

impl Ord for WordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .total_cmp(&other.line)
            .then_with(|| self.x0.total_cmp(&other.x0))
    }
}

impl PartialOrd for WordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for WordKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WordKey {}

/// A run of words sharing one line key, in ascending `x0`.
#[derive(Debug, Clone, Copy)]
pub struct LineGroup<'a> {
    pub line: f64,
    pub words: &'a [Word],
}

impl LineGroup<'_> {
    /// Words joined with single spaces.
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self.words.iter().map(|w| w.text.as_str()).collect();
        parts.join(" ")
    }
}

/// Words kept in `(round(y1, 1), x0)` order.
#[derive(Debug, Clone, Default)]
pub struct OrderedWordIndex {
    keys: Vec<WordKey>,
    words: Vec<Word>,
}

impl OrderedWordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            keys: Vec::with_capacity(n),
            words: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Insert before any words with an equal key.
    pub fn insert(&mut self, word: Word) {
        let key = WordKey::of(&word);
        let i = self.keys.partition_point(|k| *k < key);
        self.keys.insert(i, key);
        self.words.insert(i, word);
    }

    /// Insert after any words with an equal key, keeping encounter order.
    pub fn insert_right(&mut self, word: Word) {
        let key = WordKey::of(&word);
        let i = self.keys.partition_point(|k| *k <= key);
        self.keys.insert(i, key);
        self.words.insert(i, word);
    }

    /// Words in key order.
    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }

    /// The contiguous run of words whose line key equals `line_key(y1)`.
    pub fn find_range(&self, y1: f64) -> &[Word] {
        let line = line_key(y1);
        let lo = self.keys.partition_point(|k| k.line.total_cmp(&line) == Ordering::Less);
        let hi = self.keys.partition_point(|k| k.line.total_cmp(&line) != Ordering::Greater);
        &self.words[lo..hi]
    }

    /// All line groups, top of the page first.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            keys: &self.keys,
            words: &self.words,
        }
    }
}

impl FromIterator<Word> for OrderedWordIndex {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut index = Self::with_capacity(iter.size_hint().0);
        for word in iter {
            index.insert(word);
        }
        index
    }
}

impl<'a> IntoIterator for &'a OrderedWordIndex {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`LineGroup`]s, see [`OrderedWordIndex::lines`].
pub struct Lines<'a> {
    keys: &'a [WordKey],
    words: &'a [Word],
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineGroup<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.keys.first()?;
        let line = first.line;
        let n = self
            .keys
            .iter()
            .take_while(|k| k.line.total_cmp(&line) == Ordering::Equal)
            .count();
        let (words, rest_words) = self.words.split_at(n);
        self.keys = &self.keys[n..];
        self.words = rest_words;
        Some(LineGroup { line, words })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    fn word(text: &str, x0: f64, y1: f64) -> Word {
        Word::new(text, Rect::new(x0, y1 - 8.0, x0 + 4.0, y1), 0, 0)
    }

    fn texts<'a>(words: impl IntoIterator<Item = &'a Word>) -> Vec<&'a str> {
        words.into_iter().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn line_key_rounds_to_one_decimal() {
        assert_eq!(line_key(10.04), 10.0);
        assert_eq!(line_key(10.06), 10.1);
        assert_eq!(line_key(-3.26), -3.3);
    }

    #[test]
    fn iteration_is_sorted_for_any_insertion_order() {
        let base = vec![
            word("c", 30.0, 20.0),
            word("a", 0.0, 10.02),
            word("d", 0.0, 30.0),
            word("b", 12.0, 9.98),
            word("e", 5.0, 30.01),
        ];
        // Every rotation and its reverse.
        for shift in 0..base.len() {
            let mut order = base.clone();
            order.rotate_left(shift);
            for seq in [order.clone(), order.into_iter().rev().collect()] {
                let index: OrderedWordIndex = seq.into_iter().collect();
                let keys: Vec<WordKey> = index.iter().map(WordKey::of).collect();
                assert!(keys.windows(2).all(|w| w[0] <= w[1]), "unsorted: {keys:?}");
                assert_eq!(texts(&index), vec!["a", "b", "c", "d", "e"]);
            }
        }
    }

    #[test]
    fn insert_is_left_biased_and_insert_right_is_right_biased() {
        let mut index = OrderedWordIndex::new();
        index.insert(word("first", 0.0, 10.0));
        index.insert(word("second", 0.0, 10.0));
        assert_eq!(texts(&index), vec!["second", "first"]);

        let mut index = OrderedWordIndex::new();
        index.insert_right(word("first", 0.0, 10.0));
        index.insert_right(word("second", 0.0, 10.0));
        assert_eq!(texts(&index), vec!["first", "second"]);
    }

    #[test]
    fn find_range_returns_one_line() {
        let index: OrderedWordIndex = vec![
            word("top", 0.0, 5.0),
            word("mid-b", 9.0, 10.04),
            word("mid-a", 1.0, 9.96),
            word("low", 0.0, 20.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(texts(index.find_range(10.0)), vec!["mid-a", "mid-b"]);
        assert!(index.find_range(15.0).is_empty());
    }

    #[test]
    fn lines_group_contiguous_keys() {
        let index: OrderedWordIndex = vec![
            word("world", 5.0, 10.04),
            word("Hello", 0.0, 10.04),
            word("again", 0.0, 22.0),
        ]
        .into_iter()
        .collect();

        let lines: Vec<(f64, String)> = index.lines().map(|l| (l.line, l.text())).collect();
        assert_eq!(
            lines,
            vec![(10.0, "Hello world".to_string()), (22.0, "again".to_string())]
        );
    }

    #[test]
    fn empty_index() {
        let index = OrderedWordIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.lines().count(), 0);
        assert!(index.find_range(1.0).is_empty());
    }
}
