//! Literal (non-regex) search and replace.
//!
//! Matching is a sequential left-to-right scan: after each hit the scan
//! resumes at the end of that hit, so overlapping occurrences of a
//! repeating pattern are not reported. `"aaaa"` contains two `"aa"`
//! matches, not three.

use std::ops::Range;

/// A half-open range of character indices covering one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the match in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Finds every non-overlapping occurrence of `pattern` in `text`.
///
/// An empty pattern matches nothing.
pub fn find_all(text: &str, pattern: &str) -> Vec<Match> {
    if pattern.is_empty() {
        return Vec::new();
    }

    let pattern_chars = pattern.chars().count();
    let mut matches = Vec::new();

    // Walk byte offsets forward once, converting to char offsets as we go
    let mut last_byte = 0;
    let mut last_char = 0;
    for (byte_idx, _) in text.match_indices(pattern) {
        last_char += text[last_byte..byte_idx].chars().count();
        last_byte = byte_idx;
        matches.push(Match::new(last_char, last_char + pattern_chars));
    }

    matches
}

/// Replaces every literal occurrence of `pattern` with `replacement`.
///
/// Returns the rewritten text and the number of replacements made.
/// An empty pattern replaces nothing.
pub fn replace_all(text: &str, pattern: &str, replacement: &str) -> (String, usize) {
    if pattern.is_empty() {
        return (text.to_string(), 0);
    }

    let count = text.matches(pattern).count();
    if count == 0 {
        return (text.to_string(), 0);
    }

    (text.replace(pattern, replacement), count)
}
