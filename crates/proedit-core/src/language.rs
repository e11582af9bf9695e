//! Cosmetic language tags.
//!
//! A tag only labels a tab for presentation. It never touches the text:
//! there is no lexer behind it and retagging cannot fail halfway.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Languages offered in the Language menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    C,
    Html,
    Css,
}

impl Language {
    /// All tags, in menu order.
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::JavaScript,
        Language::C,
        Language::Html,
        Language::Css,
    ];

    /// The lowercase tag used in commands and config.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::C => "c",
            Language::Html => "html",
            Language::Css => "css",
        }
    }

    /// Human-readable name for menus and the status line.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::C => "C",
            Language::Html => "HTML",
            Language::Css => "CSS",
        }
    }

    /// Guesses a tag from a file extension. `.txt` and anything unknown
    /// yield `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" => Some(Language::Python),
            "js" => Some(Language::JavaScript),
            "c" | "h" => Some(Language::C),
            "html" | "htm" => Some(Language::Html),
            "css" => Some(Language::Css),
            _ => None,
        }
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag() == tag)
            .ok_or_else(|| CoreError::UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
