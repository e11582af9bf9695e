//! Tab session: the ordered set of open tabs and which one is active.
//!
//! Tabs are kept in creation order in a `Vec`; the active tab is an index
//! into it. The tab bar reads its selection from here, so there is no
//! second copy of "selected" that could drift.

use proedit_buffer::Match;
use std::ops::Range;
use std::path::Path;

use crate::config::EditorConfig;
use crate::document::Document;
use crate::gutter::{LineNumbers, ScrollSync};
use crate::language::Language;
use crate::{CoreError, CoreResult};

/// One editing session: a document, its gutter, and its view state.
#[derive(Debug, Clone)]
pub struct Tab {
    name: String,
    document: Document,
    gutter: LineNumbers,
    scroll: ScrollSync,
    /// Ranges marked by the last find
    highlights: Vec<Match>,
}

impl Tab {
    fn new(name: String, config: &EditorConfig) -> Self {
        let mut document = Document::with_undo_limit(config.undo_limit);
        if let Some(language) = config.default_language {
            document.set_language(language);
        }
        Self {
            name,
            document,
            gutter: LineNumbers::new(),
            scroll: ScrollSync::new(config.visible_lines, config.wheel_lines),
            highlights: Vec::new(),
        }
    }

    /// The unique session key, e.g. `Untitled-3`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tab bar label: the name, prefixed with `*` while unsaved.
    pub fn label(&self) -> String {
        if self.document.is_modified() {
            format!("*{}", self.name)
        } else {
            self.name.clone()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn gutter(&self) -> &LineNumbers {
        &self.gutter
    }

    pub fn scroll(&self) -> &ScrollSync {
        &self.scroll
    }

    /// Scroll state is view-only, so it may be driven directly.
    pub fn scroll_mut(&mut self) -> &mut ScrollSync {
        &mut self.scroll
    }

    pub fn highlights(&self) -> &[Match] {
        &self.highlights
    }

    pub fn language(&self) -> Option<Language> {
        self.document.language()
    }

    // ==================== Mutations ====================

    /// Keystroke insert.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> CoreResult<()> {
        self.document.insert(char_idx, text)?;
        self.after_edit();
        Ok(())
    }

    /// Keystroke delete.
    pub fn delete(&mut self, range: Range<usize>) -> CoreResult<String> {
        let deleted = self.document.delete(range)?;
        self.after_edit();
        Ok(deleted)
    }

    /// Appends text at the end of the document.
    pub fn append(&mut self, text: &str) -> CoreResult<()> {
        let end = self.document.buffer().len_chars();
        self.insert(end, text)
    }

    pub fn undo(&mut self) -> CoreResult<()> {
        self.document.undo()?;
        self.after_edit();
        Ok(())
    }

    pub fn redo(&mut self) -> CoreResult<()> {
        self.document.redo()?;
        self.after_edit();
        Ok(())
    }

    /// Replaces the content with the file at `path`.
    pub fn load(&mut self, path: &Path) -> CoreResult<()> {
        self.document.load(path)?;
        self.after_edit();
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> CoreResult<()> {
        self.document.save(path)
    }

    /// Marks every occurrence of `term` and returns the marks.
    pub fn find(&mut self, term: &str) -> &[Match] {
        self.highlights = self.document.find(term);
        &self.highlights
    }

    pub fn replace_all(&mut self, term: &str, replacement: &str) -> usize {
        let count = self.document.replace_all(term, replacement);
        self.after_edit();
        count
    }

    pub fn retag_language(&mut self, tag: &str) -> CoreResult<Language> {
        self.document.retag_language(tag)
    }

    // Marks are stale once the text moves under them
    fn after_edit(&mut self) {
        self.highlights.clear();
        self.gutter
            .recompute_from_newlines(self.document.newline_count());
        self.scroll.set_line_count(self.gutter.line_count());
    }
}

/// Owns every open tab and tracks the active one.
#[derive(Debug, Clone)]
pub struct TabSession {
    tabs: Vec<Tab>,
    active: Option<usize>,
    /// Tabs created so far; never decremented
    created: usize,
    config: EditorConfig,
}

impl TabSession {
    /// Creates an empty session.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            created: 0,
            config,
        }
    }

    /// Opens a fresh `Untitled-<n>` tab and makes it active.
    pub fn create_tab(&mut self) -> &mut Tab {
        self.created += 1;
        let name = format!("Untitled-{}", self.created);
        tracing::debug!("Creating tab {}", name);

        self.tabs.push(Tab::new(name, &self.config));
        let idx = self.tabs.len() - 1;
        self.active = Some(idx);
        &mut self.tabs[idx]
    }

    /// Returns the active tab.
    pub fn active_tab(&self) -> CoreResult<&Tab> {
        self.active
            .and_then(|idx| self.tabs.get(idx))
            .ok_or(CoreError::NoActiveTab)
    }

    /// Returns the active tab mutably.
    pub fn active_tab_mut(&mut self) -> CoreResult<&mut Tab> {
        self.active
            .and_then(|idx| self.tabs.get_mut(idx))
            .ok_or(CoreError::NoActiveTab)
    }

    /// Switches the active tab by name.
    pub fn select_tab(&mut self, name: &str) -> CoreResult<()> {
        let idx = self.index_of(name)?;
        tracing::debug!("Selecting tab {}", name);
        self.active = Some(idx);
        Ok(())
    }

    /// Removes a tab and returns it.
    ///
    /// Closing the active tab activates its left neighbour, or the new
    /// first tab when it was leftmost.
    pub fn close_tab(&mut self, name: &str) -> CoreResult<Tab> {
        let idx = self.index_of(name)?;
        tracing::debug!("Closing tab {}", name);
        let tab = self.tabs.remove(idx);

        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active > idx => Some(active - 1),
            Some(active) if active == idx => Some(idx.saturating_sub(1)),
            other => other,
        };
        Ok(tab)
    }

    /// Name of the active tab, as the tab bar should show it selected.
    pub fn selected_name(&self) -> Option<&str> {
        self.active_tab().ok().map(Tab::name)
    }

    /// Looks up a tab by name.
    pub fn tab(&self, name: &str) -> CoreResult<&Tab> {
        let idx = self.index_of(name)?;
        Ok(&self.tabs[idx])
    }

    /// Tab names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(Tab::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    /// Number of tabs created so far, including closed ones.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn index_of(&self, name: &str) -> CoreResult<usize> {
        self.tabs
            .iter()
            .position(|tab| tab.name == name)
            .ok_or_else(|| CoreError::UnknownTab(name.to_string()))
    }
}

impl Default for TabSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_labels_are_sequential() {
        let mut session = TabSession::default();
        for _ in 0..4 {
            session.create_tab();
        }
        let names: Vec<_> = session.names().collect();
        assert_eq!(names, ["Untitled-1", "Untitled-2", "Untitled-3", "Untitled-4"]);
        assert_eq!(session.selected_name(), Some("Untitled-4"));
    }

    #[test]
    fn test_labels_never_reused_after_close() {
        let mut session = TabSession::default();
        session.create_tab();
        session.create_tab();
        session.close_tab("Untitled-2").unwrap();
        session.close_tab("Untitled-1").unwrap();
        assert!(session.is_empty());

        let tab = session.create_tab();
        assert_eq!(tab.name(), "Untitled-3");
        assert_eq!(session.created(), 3);
    }

    #[test]
    fn test_empty_session_has_no_active_tab() {
        let session = TabSession::default();
        assert!(matches!(session.active_tab(), Err(CoreError::NoActiveTab)));
        assert_eq!(session.selected_name(), None);
    }

    #[test]
    fn test_select_unknown_tab() {
        let mut session = TabSession::default();
        session.create_tab();
        let err = session.select_tab("Untitled-9").unwrap_err();
        assert!(matches!(&err, CoreError::UnknownTab(name) if name == "Untitled-9"));
        assert_eq!(session.selected_name(), Some("Untitled-1"));
    }

    #[test]
    fn test_select_switches_active() {
        let mut session = TabSession::default();
        session.create_tab().append("first").unwrap();
        session.create_tab().append("second").unwrap();

        session.select_tab("Untitled-1").unwrap();
        assert_eq!(session.active_tab().unwrap().document().text(), "first");
        assert_eq!(session.selected_name(), Some("Untitled-1"));
    }

    #[test]
    fn test_close_keeps_active_valid() {
        let mut session = TabSession::default();
        for _ in 0..3 {
            session.create_tab();
        }

        // Closing a tab left of the active one shifts the index
        session.close_tab("Untitled-1").unwrap();
        assert_eq!(session.selected_name(), Some("Untitled-3"));

        // Closing the active tab falls back to its left neighbour
        session.close_tab("Untitled-3").unwrap();
        assert_eq!(session.selected_name(), Some("Untitled-2"));

        session.select_tab("Untitled-2").unwrap();
        session.create_tab();
        session.select_tab("Untitled-2").unwrap();
        session.close_tab("Untitled-2").unwrap();
        assert_eq!(session.selected_name(), Some("Untitled-4"));
    }

    #[test]
    fn test_close_unknown_tab() {
        let mut session = TabSession::default();
        assert!(matches!(
            session.close_tab("Untitled-1"),
            Err(CoreError::UnknownTab(_))
        ));
    }

    #[test]
    fn test_edits_recompute_gutter() {
        let mut session = TabSession::default();
        let tab = session.create_tab();
        assert_eq!(tab.gutter().numbers(), 1..=1);

        tab.append("one\ntwo\nthree").unwrap();
        assert_eq!(tab.gutter().numbers(), 1..=3);

        tab.delete(4..8).unwrap();
        assert_eq!(tab.document().text(), "one\nthree");
        assert_eq!(tab.gutter().line_count(), 2);

        tab.undo().unwrap();
        assert_eq!(tab.gutter().line_count(), 3);
    }

    #[test]
    fn test_load_recomputes_gutter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<p>\n</p>\n").unwrap();

        let mut session = TabSession::default();
        let tab = session.create_tab();
        tab.load(&path).unwrap();
        assert_eq!(tab.gutter().line_count(), 3);
        assert_eq!(tab.language(), Some(Language::Html));
    }

    #[test]
    fn test_find_marks_and_edit_clears_them() {
        let mut session = TabSession::default();
        let tab = session.create_tab();
        tab.append("aaaa").unwrap();

        assert_eq!(tab.find("aa"), [Match::new(0, 2), Match::new(2, 4)]);
        assert_eq!(tab.highlights().len(), 2);

        tab.append("!").unwrap();
        assert!(tab.highlights().is_empty());
    }

    #[test]
    fn test_default_language_applies_to_new_tabs() {
        let config = EditorConfig {
            default_language: Some(Language::Css),
            ..EditorConfig::default()
        };
        let mut session = TabSession::new(config);
        let tab = session.create_tab();
        assert_eq!(tab.language(), Some(Language::Css));
        assert_eq!(tab.document().text(), "");
    }

    #[test]
    fn test_label_marks_unsaved() {
        let mut session = TabSession::default();
        let tab = session.create_tab();
        assert_eq!(tab.label(), "Untitled-1");
        tab.append("x").unwrap();
        assert_eq!(tab.label(), "*Untitled-1");
    }
}
