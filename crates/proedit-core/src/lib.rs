//! # ProEdit Core
//!
//! Tab session, line-number gutter and command dispatch.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        Editor                            │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐│
//! │  │   Config    │ │  Event Bus  │ │  Command Registry   ││
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘│
//! │         │                                                │
//! │  ┌──────┴──────────────────────────────────┐            │
//! │  │               Tab Session                │            │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐    │            │
//! │  │  │  Tab 1  │ │  Tab 2  │ │  Tab 3  │    │            │
//! │  │  └─────────┘ └─────────┘ └─────────┘    │            │
//! │  └─────────────────────────────────────────┘            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tab pairs a [`Document`] with a [`LineNumbers`] gutter and a
//! [`ScrollSync`]. Every command runs to completion on the caller's
//! thread; there is no background work.

pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod event;
pub mod gutter;
pub mod language;
pub mod menu;
pub mod prompt;
pub mod session;

use std::path::PathBuf;

pub use command::{Command, CommandHandler, CommandRegistry};
pub use config::Config;
pub use document::Document;
pub use editor::{CommandOutcome, Editor};
pub use event::{EditorEvent, EventBus};
pub use gutter::{LineNumbers, ScrollSync};
pub use language::Language;
pub use menu::{MenuBar, MenuItem};
pub use prompt::{FileFilter, Prompt};
pub use session::{Tab, TabSession};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Could not read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Buffer error: {0}")]
    Buffer(#[from] proedit_buffer::BufferError),
}

impl CoreError {
    /// Short title for the error notification.
    pub fn title(&self) -> &'static str {
        match self {
            CoreError::FileRead { .. } => "Open failed",
            CoreError::FileWrite { .. } => "Save failed",
            CoreError::UnsupportedLanguage(_) => "Error",
            CoreError::UnknownTab(_) | CoreError::NoActiveTab => "Tab error",
            CoreError::CommandNotFound(_) => "Unknown command",
            CoreError::Buffer(_) => "Edit failed",
        }
    }
}
