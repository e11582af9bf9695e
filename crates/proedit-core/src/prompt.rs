//! The user-facing dialogs commands depend on.
//!
//! File pickers, string prompts and error boxes belong to whatever front
//! end hosts the editor. Commands reach them only through [`Prompt`], so
//! the core stays toolkit-independent and tests can script the answers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named group of extensions offered by a file dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// Pattern list as dialogs usually show it: `*.txt;*.py`.
    pub fn pattern(&self) -> String {
        self.extensions
            .iter()
            .map(|ext| format!("*.{ext}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Blocking dialogs. Every `None` means the user cancelled.
pub trait Prompt {
    /// Asks for a file to open.
    fn open_path(&mut self, filters: &[FileFilter]) -> Option<PathBuf>;

    /// Asks where to save; `suggested` is the tab's current file, if any.
    fn save_path(&mut self, filters: &[FileFilter], suggested: Option<&Path>) -> Option<PathBuf>;

    /// Asks for one line of text.
    fn ask_string(&mut self, title: &str, message: &str) -> Option<String>;

    /// Shows an error and waits for the user to dismiss it.
    fn notify_error(&mut self, title: &str, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_pattern() {
        let filter = FileFilter {
            name: "Text files".to_string(),
            extensions: vec!["txt".to_string(), "py".to_string()],
        };
        assert_eq!(filter.pattern(), "*.txt;*.py");
    }
}
