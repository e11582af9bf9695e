//! Line-number gutter and scroll synchronization.
//!
//! The gutter is derived state: `1..=N` where `N` is the number of
//! `'\n'` characters plus one. It is recomputed after every mutation and
//! never edited directly.
//!
//! The content view and the gutter view share one scroll position,
//! expressed as the fraction of the document above the first visible
//! line (the same convention as a scrollbar's `first` value). A scroll
//! from either side lands on both views within the same call.

use std::fmt::Write as _;
use std::ops::RangeInclusive;

/// Raw wheel delta of one notch.
pub const WHEEL_DELTA: i32 = 120;

/// Number of lines in `content`: newline count plus one.
pub fn line_count(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

/// The `1..=N` index sidebar of one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumbers {
    count: usize,
}

impl LineNumbers {
    /// Gutter for an empty document (a single line).
    pub fn new() -> Self {
        Self { count: 1 }
    }

    /// Recomputes from the full content and returns the new numbers.
    pub fn recompute(&mut self, content: &str) -> RangeInclusive<usize> {
        self.count = line_count(content);
        self.numbers()
    }

    /// Recomputes from a known newline count, avoiding a text copy.
    pub fn recompute_from_newlines(&mut self, newlines: usize) -> RangeInclusive<usize> {
        self.count = newlines + 1;
        self.numbers()
    }

    pub fn line_count(&self) -> usize {
        self.count
    }

    pub fn numbers(&self) -> RangeInclusive<usize> {
        1..=self.count
    }

    /// Digits needed for the widest number.
    pub fn digits(&self) -> usize {
        self.count.to_string().len()
    }

    /// Sidebar text: one right-aligned number per line, no trailing newline.
    pub fn render(&self, min_width: usize) -> String {
        self.render_range(self.numbers(), min_width)
    }

    /// Sidebar text for a sub-range, e.g. the visible window.
    pub fn render_range(&self, range: RangeInclusive<usize>, min_width: usize) -> String {
        let width = self.digits().max(min_width);
        let mut out = String::new();
        for n in range {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(out, "{n:>width$}");
        }
        out
    }
}

impl Default for LineNumbers {
    fn default() -> Self {
        Self::new()
    }
}

/// Which view a scroll came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    Content,
    Gutter,
}

/// Shared vertical scroll state of the content and gutter views.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSync {
    content_first: f64,
    gutter_first: f64,
    line_count: usize,
    visible_lines: usize,
    wheel_lines: usize,
}

impl ScrollSync {
    /// `visible_lines` is the height of the view in text lines;
    /// `wheel_lines` is how far one wheel notch moves.
    pub fn new(visible_lines: usize, wheel_lines: usize) -> Self {
        Self {
            content_first: 0.0,
            gutter_first: 0.0,
            line_count: 1,
            visible_lines: visible_lines.max(1),
            wheel_lines,
        }
    }

    /// Fraction reported by the content view.
    pub fn content_fraction(&self) -> f64 {
        self.content_first
    }

    /// Fraction reported by the gutter view.
    pub fn gutter_fraction(&self) -> f64 {
        self.gutter_first
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    /// Largest first-visible fraction that still fills the view.
    pub fn max_fraction(&self) -> f64 {
        let total = self.line_count as f64;
        (1.0 - self.visible_lines as f64 / total).max(0.0)
    }

    /// Tells the views the document length changed; re-clamps the offset.
    pub fn set_line_count(&mut self, line_count: usize) {
        self.line_count = line_count.max(1);
        let first = self.content_first;
        self.apply(first);
    }

    /// Scrolls both views to `fraction`, whichever view it came from.
    ///
    /// Returns the fraction both views now report.
    pub fn scroll_to(&mut self, source: ScrollSource, fraction: f64) -> f64 {
        tracing::trace!(?source, fraction, "scroll");
        self.apply(fraction)
    }

    /// Scroll originating in the content view.
    pub fn sync_scroll(&mut self, fraction: f64) -> f64 {
        self.scroll_to(ScrollSource::Content, fraction)
    }

    /// Applies a raw wheel delta to both views.
    ///
    /// Positive deltas scroll up, one `WHEEL_DELTA` per notch; partial
    /// notches are dropped.
    pub fn wheel(&mut self, delta: i32) -> f64 {
        let notches = -(delta / WHEEL_DELTA) as isize;
        let per_notch = isize::try_from(self.wheel_lines).unwrap_or(isize::MAX);
        self.scroll_lines(notches.saturating_mul(per_notch))
    }

    /// Moves both views by whole text lines (negative = up).
    pub fn scroll_lines(&mut self, lines: isize) -> f64 {
        let step = lines as f64 / self.line_count as f64;
        self.apply(self.content_first + step)
    }

    /// Zero-based index of the first visible line.
    pub fn first_visible_line(&self) -> usize {
        let line = (self.content_first * self.line_count as f64).round() as usize;
        line.min(self.line_count - 1)
    }

    /// One-based numbers of the lines currently on screen.
    pub fn visible_range(&self) -> RangeInclusive<usize> {
        let start = self.first_visible_line() + 1;
        let end = (start + self.visible_lines - 1).min(self.line_count);
        start..=end
    }

    fn apply(&mut self, fraction: f64) -> f64 {
        let fraction = if fraction.is_finite() { fraction } else { 0.0 };
        let clamped = fraction.clamp(0.0, self.max_fraction());
        self.content_first = clamped;
        self.gutter_first = clamped;
        clamped
    }
}
