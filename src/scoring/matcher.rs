//! Pattern matching over raw document text

use super::taxonomy::Pattern;

/// One non-overlapping regex match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMatch<'t> {
    /// Byte offset of the first matched byte
    pub start: usize,
    /// Byte offset one past the last matched byte
    pub end: usize,
    pub text: &'t str,
}

/// All non-overlapping matches of `pattern` in `text`, in order of position.
pub fn find_matches<'t>(pattern: &Pattern, text: &'t str) -> Vec<TextMatch<'t>> {
    pattern
        .regex()
        .find_iter(text)
        .map(|m| TextMatch {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
        })
        .collect()
}
