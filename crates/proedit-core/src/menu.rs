//! Menu bar model.
//!
//! Menus are plain data: each item names the command id it triggers, and
//! the front end resolves clicks through the command registry.

use crate::command::Command;
use crate::language::Language;

/// One entry in a drop-down menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action { label: String, command: String },
    Separator,
}

impl MenuItem {
    fn action(command: Command) -> Self {
        MenuItem::Action {
            label: command.display_name().to_string(),
            command: command.id(),
        }
    }
}

/// A titled drop-down menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
}

/// The window's menu bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBar {
    pub menus: Vec<Menu>,
}

impl MenuBar {
    /// File, Edit and Language menus.
    pub fn standard() -> Self {
        let file = Menu {
            title: "File".to_string(),
            items: vec![
                MenuItem::action(Command::NewTab),
                MenuItem::action(Command::Open),
                MenuItem::action(Command::Save),
                MenuItem::action(Command::CloseTab),
                MenuItem::Separator,
                MenuItem::action(Command::Exit),
            ],
        };
        let edit = Menu {
            title: "Edit".to_string(),
            items: vec![
                MenuItem::action(Command::Find),
                MenuItem::action(Command::Replace),
                MenuItem::Separator,
                MenuItem::action(Command::Undo),
                MenuItem::action(Command::Redo),
            ],
        };
        let language = Menu {
            title: "Language".to_string(),
            items: Language::ALL
                .into_iter()
                .map(|lang| MenuItem::action(Command::SetLanguage(lang)))
                .collect(),
        };

        Self {
            menus: vec![file, edit, language],
        }
    }

    /// Resolves `"Menu/Item"` (case-insensitive) to a command id.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let (menu_title, item_label) = path.split_once('/')?;
        let menu = self
            .menus
            .iter()
            .find(|m| m.title.eq_ignore_ascii_case(menu_title.trim()))?;
        menu.items.iter().find_map(|item| match item {
            MenuItem::Action { label, command } if label.eq_ignore_ascii_case(item_label.trim()) => {
                Some(command.as_str())
            }
            _ => None,
        })
    }

    /// Every command id reachable from the menus.
    pub fn command_ids(&self) -> impl Iterator<Item = &str> {
        self.menus.iter().flat_map(|menu| {
            menu.items.iter().filter_map(|item| match item {
                MenuItem::Action { command, .. } => Some(command.as_str()),
                MenuItem::Separator => None,
            })
        })
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::standard()
    }
}
