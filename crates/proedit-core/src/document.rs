//! Document management.
//!
//! A `Document` composes a `TextBuffer` with the presentation-only
//! language tag. File errors are mapped to `CoreError` variants that
//! carry the offending path.

use proedit_buffer::{BufferError, Match, TextBuffer};
use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;

use crate::language::Language;
use crate::{CoreError, CoreResult};

/// The text of one tab plus its optional backing file.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The underlying text buffer
    buffer: TextBuffer,

    /// Cosmetic language tag
    language: Option<Language>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document keeping at most `undo_limit` undo steps.
    pub fn with_undo_limit(undo_limit: usize) -> Self {
        Self {
            buffer: TextBuffer::with_history_limit(undo_limit),
            language: None,
        }
    }

    // ==================== Getters ====================

    /// Returns the file path.
    pub fn path(&self) -> Option<&Path> {
        self.buffer.file_path()
    }

    /// Returns the language tag.
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Returns true if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Returns the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns all text.
    pub fn text(&self) -> Cow<'_, str> {
        self.buffer.text()
    }

    /// Number of `'\n'` characters in the text.
    pub fn newline_count(&self) -> usize {
        self.buffer.newline_count()
    }

    // ==================== File Operations ====================

    /// Replaces the content with the file at `path` and adopts the path.
    ///
    /// A recognizable extension also sets the language tag.
    pub fn load(&mut self, path: impl AsRef<Path>) -> CoreResult<Cow<'_, str>> {
        let path = path.as_ref();
        self.buffer.load(path).map_err(|err| match err {
            BufferError::Io(source) => CoreError::FileRead {
                path: path.to_path_buf(),
                source,
            },
            other => CoreError::Buffer(other),
        })?;

        if let Some(language) = Language::from_path(path) {
            self.language = Some(language);
        }
        tracing::info!("Loaded {} ({} bytes)", path.display(), self.buffer.len_bytes());
        Ok(self.buffer.text())
    }

    /// Writes the content verbatim to `path` and adopts the path.
    pub fn save(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.buffer.save_as(path).map_err(|err| match err {
            BufferError::Io(source) => CoreError::FileWrite {
                path: path.to_path_buf(),
                source,
            },
            other => CoreError::Buffer(other),
        })?;
        tracing::info!("Saved {} ({} bytes)", path.display(), self.buffer.len_bytes());
        Ok(())
    }

    // ==================== Text Editing ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> CoreResult<()> {
        Ok(self.buffer.insert(char_idx, text)?)
    }

    /// Deletes a character range.
    pub fn delete(&mut self, range: Range<usize>) -> CoreResult<String> {
        Ok(self.buffer.delete(range)?)
    }

    /// Undoes the last edit step.
    pub fn undo(&mut self) -> CoreResult<()> {
        Ok(self.buffer.undo()?)
    }

    /// Redoes the last undone edit step.
    pub fn redo(&mut self) -> CoreResult<()> {
        Ok(self.buffer.redo()?)
    }

    // ==================== Search ====================

    /// Every non-overlapping occurrence of `term`, left to right.
    pub fn find(&self, term: &str) -> Vec<Match> {
        self.buffer.find_all(term)
    }

    /// Replaces every literal occurrence of `term`; returns the count.
    pub fn replace_all(&mut self, term: &str, replacement: &str) -> usize {
        self.buffer.replace_all(term, replacement)
    }

    // ==================== Language ====================

    /// Sets the language tag from its name. Content is never touched.
    pub fn retag_language(&mut self, tag: &str) -> CoreResult<Language> {
        let language: Language = tag.parse()?;
        self.set_language(language);
        Ok(language)
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = Some(language);
    }
}
