//! # ProEdit Buffer
//!
//! Rope-backed text buffer for a single editor tab.
//!
//! ## Key Concepts
//!
//! ### Ownership & Borrowing
//! - `TextBuffer` owns the rope and its undo history
//! - `text()` hands out a borrowed `Cow<str>` view
//! - Mutations require `&mut self` (exclusive access)
//!
//! ### Offsets
//! - Every public offset is a **character** index, never a byte index
//! - Search results use half-open `start..end` character ranges

mod buffer;
mod history;
mod search;

pub use buffer::TextBuffer;
pub use history::{Edit, EditGroup, EditKind, History};
pub use search::{Match, find_all, replace_all};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Invalid range: {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
