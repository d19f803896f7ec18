//! Proximity between pattern pairs
//!
//! The word distance between two matches is the number of separator-delimited
//! tokens in the text strictly between them. Separators are Unicode whitespace
//! plus the ASCII information separators U+001C..=U+001F:
//!
//! ```text
//! between  = text[min(end_a, end_b) .. max(start_a, start_b)]
//! distance = tokens(between)            (0 when the bounds are out of order)
//! score    = 1 / (1 + min distance over all match pairs)
//! ```
//!
//! A score of 1.0 means adjacent or overlapping matches; 0.0 means one of the
//! patterns never matched. Token counts come from a [`WordIndex`] built once
//! per document, so each pair costs a binary search instead of a re-split.

use super::matcher::TextMatch;

/// Whether `ch` splits two tokens
pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

/// Sorted byte offsets where separator-delimited tokens begin
#[derive(Debug, Clone)]
pub struct WordIndex<'t> {
    text: &'t str,
    starts: Vec<usize>,
}

impl<'t> WordIndex<'t> {
    pub fn new(text: &'t str) -> Self {
        let mut starts = Vec::new();
        let mut prev_ws = true;
        for (offset, ch) in text.char_indices() {
            let ws = is_separator(ch);
            if prev_ws && !ws {
                starts.push(offset);
            }
            prev_ws = ws;
        }
        Self { text, starts }
    }

    /// Total token count of the document
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Tokens in `text[lo..hi]`; 0 when `lo >= hi`.
    ///
    /// Both offsets must be char boundaries (match offsets always are).
    pub fn words_between(&self, lo: usize, hi: usize) -> usize {
        if lo >= hi {
            return 0;
        }
        // Tokens starting strictly inside the slice begin after a separator
        let first = self.starts.partition_point(|&s| s <= lo);
        let last = self.starts.partition_point(|&s| s < hi);
        let inner = last.saturating_sub(first);

        // A token cut by `lo` still counts once
        let leading = self.text[lo..]
            .chars()
            .next()
            .is_some_and(|c| !is_separator(c));

        inner + usize::from(leading)
    }

    /// Word distance between two matches
    pub fn word_distance(&self, a: &TextMatch<'_>, b: &TextMatch<'_>) -> usize {
        self.words_between(a.end.min(b.end), a.start.max(b.start))
    }
}

/// Key for a pattern pair: descriptions in declaration order
pub fn pair_key(first: &str, second: &str) -> String {
    format!("{first} - {second}")
}

/// Convert a minimum word distance into a score in (0, 1]
pub fn score_from_distance(distance: usize) -> f64 {
    1.0 / (1.0 + distance as f64)
}

/// Minimum word distance over all (a, b) match pairs, or `None` if either side
/// has no matches.
///
/// Both slices must come from `find_iter` (sorted, non-overlapping), so for
/// each `a` only the last `b` ending at or before `a.start` and the first `b`
/// after it can be nearest.
pub fn min_word_distance(
    index: &WordIndex<'_>,
    a_matches: &[TextMatch<'_>],
    b_matches: &[TextMatch<'_>],
) -> Option<usize> {
    if a_matches.is_empty() || b_matches.is_empty() {
        return None;
    }

    let mut best = usize::MAX;
    for a in a_matches {
        let j = b_matches.partition_point(|b| b.end <= a.start);
        let candidates = j.checked_sub(1).into_iter().chain(Some(j));
        for k in candidates {
            if let Some(b) = b_matches.get(k) {
                best = best.min(index.word_distance(a, b));
            }
        }
        if best == 0 {
            break;
        }
    }
    Some(best)
}

/// Proximity score for two patterns' matches; 0.0 when either is absent.
pub fn proximity_score(
    index: &WordIndex<'_>,
    a_matches: &[TextMatch<'_>],
    b_matches: &[TextMatch<'_>],
) -> f64 {
    min_word_distance(index, a_matches, b_matches).map_or(0.0, score_from_distance)
}
