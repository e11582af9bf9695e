//! Editor configuration.
//!
//! Read-only: the editor loads a TOML file named on the command line and
//! never writes configuration back. `#[serde(default)]` on every section
//! lets a file set only the keys it cares about.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::language::Language;
use crate::prompt::FileFilter;

/// Main editor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editing and scrolling behavior
    pub editor: EditorConfig,

    /// File dialog settings
    pub files: FileConfig,

    /// Window appearance
    pub ui: UiConfig,
}

impl Config {
    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses config from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Editing and scrolling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Text lines moved per mouse-wheel notch
    pub wheel_lines: usize,

    /// Height of the content view in text lines
    pub visible_lines: usize,

    /// Undo history limit per tab
    pub undo_limit: usize,

    /// Language tag given to new tabs
    pub default_language: Option<Language>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            wheel_lines: 1,
            visible_lines: 30,
            undo_limit: 1000,
            default_language: None,
        }
    }
}

/// File dialog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Appended to save paths that have no extension
    pub default_extension: String,

    /// Filters offered by the open/save dialogs
    pub filters: Vec<FileFilter>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            default_extension: "txt".to_string(),
            filters: vec![FileFilter {
                name: "Text files".to_string(),
                extensions: ["txt", "py", "html", "css", "js", "c"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }],
        }
    }
}

/// Window appearance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Window title
    pub title: String,

    /// Font shared by the content and gutter views
    pub font_family: String,

    /// Font size in points
    pub font_size: u16,

    /// Minimum gutter width in digits
    pub gutter_width: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "ProEdit".to_string(),
            font_family: "Consolas".to_string(),
            font_size: 12,
            gutter_width: 4,
        }
    }
}

impl UiConfig {
    /// Start-up line naming the window and its font, e.g.
    /// `ProEdit (Consolas 12pt)`.
    pub fn banner(&self) -> String {
        format!("{} ({} {}pt)", self.title, self.font_family, self.font_size)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.wheel_lines, 1);
        assert_eq!(config.files.default_extension, "txt");
        assert_eq!(config.files.filters[0].extensions.len(), 6);
        assert_eq!(config.ui.title, "ProEdit");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [editor]
            wheel_lines = 3
            default_language = "python"

            [ui]
            font_size = 14
            "#,
        )
        .unwrap();

        assert_eq!(config.editor.wheel_lines, 3);
        assert_eq!(config.editor.visible_lines, 30);
        assert_eq!(config.editor.default_language, Some(Language::Python));
        assert_eq!(config.ui.font_size, 14);
        assert_eq!(config.ui.font_family, "Consolas");
        assert_eq!(config.ui.banner(), "ProEdit (Consolas 14pt)");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed = Config::parse(&toml).unwrap();
        assert_eq!(parsed.editor.undo_limit, config.editor.undo_limit);
    }

    #[test]
    fn test_bad_config_is_parse_error() {
        assert!(matches!(
            Config::parse("[editor]\nwheel_lines = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
