//! Undo/redo history management.
//!
//! Each edit is stored as a value that can be:
//! - Undone (its inverse applied to the buffer)
//! - Redone (re-applied after undo)
//!
//! Rapid adjacent keystrokes coalesce into one undo step, and compound
//! operations (whole-buffer load, replace-all) are grouped explicitly.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The type of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// What kind of edit this is
    pub kind: EditKind,
    /// Character position where the edit occurred
    pub position: usize,
    /// The text that was inserted or deleted
    pub content: String,
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            content: content.into(),
        }
    }

    /// Returns the inverse of this edit (for undo).
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            position: self.position,
            content: self.content.clone(),
        }
    }

    /// Number of characters this edit covers.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if this edit can be coalesced with another.
    ///
    /// Two edits can be coalesced if they are the same kind, adjacent,
    /// and neither contains a newline.
    pub fn can_coalesce(&self, other: &Edit) -> bool {
        if self.kind != other.kind {
            return false;
        }

        if self.content.contains('\n') || other.content.contains('\n') {
            return false;
        }

        match self.kind {
            EditKind::Insert => self.position + self.char_len() == other.position,
            // Backspace lands just before us, forward delete at the same spot
            EditKind::Delete => {
                other.position + other.char_len() == self.position
                    || self.position == other.position
            }
        }
    }

    /// Coalesces another edit into this one.
    pub fn coalesce(&mut self, other: Edit) {
        match self.kind {
            EditKind::Insert => {
                self.content.push_str(&other.content);
            }
            EditKind::Delete => {
                if other.position < self.position {
                    self.content = other.content + &self.content;
                    self.position = other.position;
                } else {
                    self.content.push_str(&other.content);
                }
            }
        }
    }
}

/// A group of edits that are undone/redone together.
#[derive(Debug, Clone)]
pub struct EditGroup {
    /// The edits in this group, in application order
    pub edits: Vec<Edit>,
    /// When this group was last extended; `None` disables coalescing
    pub timestamp: Option<Instant>,
}

impl EditGroup {
    /// Creates a new edit group.
    pub fn new(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            timestamp: Some(Instant::now()),
        }
    }

    /// Adds an edit to this group.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }
}

/// Manages undo/redo history.
///
/// `VecDeque` lets the oldest group fall off the front once `max_size`
/// is reached while undo pops from the back.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<EditGroup>,
    redo_stack: Vec<EditGroup>,
    max_size: usize,
    coalesce_threshold: Duration,
    in_group: bool,
    group_started: bool,
}

impl History {
    /// Creates a new history with the given capacity (in undo steps).
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            coalesce_threshold: Duration::from_millis(300),
            in_group: false,
            group_started: false,
        }
    }

    /// Pushes an edit onto the history.
    ///
    /// Clears the redo stack; may coalesce with the previous edit.
    pub fn push(&mut self, edit: Edit) {
        self.redo_stack.clear();

        if self.in_group {
            if self.group_started {
                if let Some(group) = self.undo_stack.back_mut() {
                    group.push(edit);
                    return;
                }
            }
            let mut group = EditGroup::new(edit);
            group.timestamp = None;
            self.push_group(group);
            self.group_started = true;
            return;
        }

        if let Some(last_group) = self.undo_stack.back_mut() {
            let recent = last_group
                .timestamp
                .is_some_and(|t| t.elapsed() < self.coalesce_threshold);

            if recent {
                if let Some(last_edit) = last_group.edits.last_mut() {
                    if last_edit.can_coalesce(&edit) {
                        last_edit.coalesce(edit);
                        last_group.timestamp = Some(Instant::now());
                        return;
                    }
                }
            }
        }

        self.push_group(EditGroup::new(edit));
    }

    fn push_group(&mut self, group: EditGroup) {
        self.undo_stack.push_back(group);
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Starts an edit group.
    ///
    /// All edits until `end_group()` become a single undo step.
    pub fn begin_group(&mut self) {
        self.in_group = true;
        self.group_started = false;
    }

    /// Ends the current edit group.
    pub fn end_group(&mut self) {
        self.in_group = false;
        self.group_started = false;
    }

    /// Pops the last undo step.
    ///
    /// The returned edits are in application order; callers reverse them.
    pub fn undo(&mut self) -> Option<Vec<Edit>> {
        let group = self.undo_stack.pop_back()?;
        let edits = group.edits.clone();
        self.redo_stack.push(group);
        Some(edits)
    }

    /// Pops the last undone step for re-application.
    pub fn redo(&mut self) -> Option<Vec<Edit>> {
        let mut group = self.redo_stack.pop()?;
        let edits = group.edits.clone();
        // Redone steps never absorb later keystrokes
        group.timestamp = None;
        self.undo_stack.push_back(group);
        Some(edits)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Returns the number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}
