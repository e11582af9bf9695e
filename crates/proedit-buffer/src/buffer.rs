//! Core text buffer implementation using a rope.
//!
//! ## Ownership in Action
//!
//! ```rust,ignore
//! let buffer = TextBuffer::new();  // buffer OWNS the rope
//! let text = buffer.text();        // text BORROWS from buffer
//! // buffer.insert(0, "x");        // ERROR! Can't mutate while borrowed
//! drop(text);
//! buffer.insert(0, "x");           // Now OK!
//! ```

use ropey::Rope;
use std::borrow::Cow;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::history::{Edit, EditKind, History};
use crate::search::{self, Match};
use crate::{BufferError, BufferResult};

const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// A text buffer backed by a rope, with linear undo history.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Edit history for undo/redo
    history: History,

    /// Whether the buffer has unsaved changes
    modified: bool,

    /// Backing file, set by the first load or save
    file_path: Option<PathBuf>,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use proedit_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Creates an empty buffer keeping at most `limit` undo steps.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            rope: Rope::new(),
            history: History::new(limit),
            modified: false,
            file_path: None,
        }
    }

    /// Loads a buffer from a file.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let mut buffer = Self::new();
        buffer.load(path)?;
        buffer.history.clear();
        Ok(buffer)
    }

    /// Replaces the whole content with the text of `path`.
    ///
    /// The file is read completely before the buffer is touched, so a
    /// failed read leaves content and path as they were. The replacement
    /// is a single undo step.
    pub fn load(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        self.set_text(&content);
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Saves the buffer to its associated file.
    pub fn save(&mut self) -> BufferResult<()> {
        let path = self.file_path.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No file path set")
        })?;
        self.save_as(&path)
    }

    /// Saves the buffer to a specific path.
    ///
    /// Writes a uniquely named sibling temp file and renames it over
    /// `path`, so a failure never leaves a partially written target behind.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropped (and deleted) on any early return
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(self.text().as_bytes())?;
        temp.persist(path).map_err(|err| err.error)?;

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    ///
    /// Borrowed when the rope is a single chunk, allocated otherwise.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        self.check_range(&range)?;
        Ok(self.rope.slice(range).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Counts `'\n'` characters.
    ///
    /// Unlike `Rope::len_lines`, a lone `'\r'` or Unicode line separator
    /// does not start a new line here.
    pub fn newline_count(&self) -> usize {
        self.rope
            .chunks()
            .map(|chunk| chunk.bytes().filter(|&b| b == b'\n').count())
            .sum()
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.history.push(Edit::insert(char_idx, text));
        self.rope.insert(char_idx, text);
        self.modified = true;
        Ok(())
    }

    /// Deletes text in a character range, returning what was removed.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        self.history.push(Edit::delete(range.start, deleted.clone()));
        self.rope.remove(range);
        self.modified = true;
        Ok(deleted)
    }

    /// Overwrites the whole content as one undo step.
    pub fn set_text(&mut self, text: &str) {
        self.history.begin_group();
        let len = self.len_chars();
        if len > 0 {
            let old: String = self.rope.slice(..).into();
            self.history.push(Edit::delete(0, old));
        }
        if !text.is_empty() {
            self.history.push(Edit::insert(0, text));
        }
        self.history.end_group();

        self.rope = Rope::from_str(text);
        self.modified = true;
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit step.
    pub fn undo(&mut self) -> BufferResult<()> {
        let edits = self.history.undo().ok_or(BufferError::NothingToUndo)?;
        for edit in edits.iter().rev() {
            self.apply(&edit.inverse());
        }
        self.modified = true;
        Ok(())
    }

    /// Redoes the last undone edit step.
    pub fn redo(&mut self) -> BufferResult<()> {
        let edits = self.history.redo().ok_or(BufferError::NothingToRedo)?;
        for edit in &edits {
            self.apply(edit);
        }
        self.modified = true;
        Ok(())
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Applies an edit without recording it
    fn apply(&mut self, edit: &Edit) {
        match edit.kind {
            EditKind::Insert => self.rope.insert(edit.position, &edit.content),
            EditKind::Delete => {
                let end = edit.position + edit.char_len();
                self.rope.remove(edit.position..end);
            }
        }
    }

    // ==================== State Queries ====================

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the associated file path, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    // ==================== Search ====================

    /// Finds all non-overlapping occurrences of a literal pattern.
    pub fn find_all(&self, pattern: &str) -> Vec<Match> {
        search::find_all(&self.text(), pattern)
    }

    /// Replaces all occurrences of a literal pattern in one pass.
    ///
    /// Returns the number of replacements. When nothing matches, the
    /// buffer is left alone and stays unmodified.
    pub fn replace_all(&mut self, pattern: &str, replacement: &str) -> usize {
        let (text, count) = search::replace_all(&self.text(), pattern, replacement);
        if count > 0 {
            self.set_text(&text);
        }
        count
    }

    fn check_range(&self, range: &Range<usize>) -> BufferResult<()> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(())
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            history: History::new(DEFAULT_HISTORY_LIMIT),
            modified: false,
            file_path: None,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let content = "first line\nsecond line\r\n\ttabbed\nno newline at end";

        let mut buffer = TextBuffer::from(content);
        buffer.save_as(&path).unwrap();
        assert_eq!(buffer.file_path(), Some(path.as_path()));
        assert!(!buffer.is_modified());

        let loaded = TextBuffer::from_file(&path).unwrap();
        assert_eq!(loaded.text(), content);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.py");
        TextBuffer::from("print(1)").save_as(&path).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("a.py")]);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "a much longer previous version").unwrap();

        TextBuffer::from("short").save_as(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.txt");

        let mut buffer = TextBuffer::from("text");
        buffer.insert(4, "!").unwrap();
        assert!(matches!(buffer.save_as(&path), Err(BufferError::Io(_))));
        assert!(buffer.is_modified());
        assert_eq!(buffer.file_path(), None);
    }

    #[test]
    fn test_failed_load_keeps_content() {
        let dir = tempdir().unwrap();
        let mut buffer = TextBuffer::from("keep me");

        let result = buffer.load(dir.path().join("nope.txt"));
        assert!(matches!(result, Err(BufferError::Io(_))));
        assert_eq!(buffer.text(), "keep me");
        assert_eq!(buffer.file_path(), None);
    }

    #[test]
    fn test_load_replaces_content_and_can_be_undone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.c");
        std::fs::write(&path, "int main;\n").unwrap();

        let mut buffer = TextBuffer::from("scratch");
        buffer.load(&path).unwrap();
        assert_eq!(buffer.text(), "int main;\n");
        assert!(!buffer.is_modified());

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "scratch");
    }

    #[test]
    fn test_replace_all_on_buffer() {
        let mut buffer = TextBuffer::from("cat and cat");
        assert_eq!(buffer.replace_all("cat", "dog"), 2);
        assert_eq!(buffer.text(), "dog and dog");

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "cat and cat");
    }

    #[test]
    fn test_replace_all_without_match_keeps_buffer_clean() {
        let mut buffer = TextBuffer::from("no pets here");
        assert_eq!(buffer.replace_all("cat", "dog"), 0);
        assert_eq!(buffer.text(), "no pets here");
        assert!(!buffer.is_modified());
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_find_all_on_buffer() {
        let buffer = TextBuffer::from("aaaa");
        let matches = buffer.find_all("aa");
        assert_eq!(matches, vec![Match::new(0, 2), Match::new(2, 4)]);
    }

    #[test]
    fn test_save_keeps_unrelated_sibling_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let sibling = dir.path().join(".notes.txt.tmp");
        std::fs::write(&sibling, "USER DATA").unwrap();

        TextBuffer::from("saved").save_as(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "saved");
        assert_eq!(std::fs::read_to_string(&sibling).unwrap(), "USER DATA");
    }
}
