//! Command system for editor actions.
//!
//! Built-in actions are a closed `Command` enum. Dispatch goes through a
//! `CommandRegistry`: a table from command id (`"file.open"`) to a handler
//! closure over the editor and the front end's prompts. Menus, key
//! bindings and scripts all resolve to an id, so none of them need to know
//! how a command is carried out.

use std::collections::HashMap;
use std::rc::Rc;

use crate::editor::{CommandOutcome, Editor};
use crate::language::Language;
use crate::prompt::Prompt;
use crate::CoreResult;

/// Built-in editor commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // File commands
    NewTab,
    Open,
    Save,
    CloseTab,
    Exit,

    // Edit commands
    Find,
    Replace,
    Undo,
    Redo,

    // Language menu
    SetLanguage(Language),
}

impl Command {
    /// Every built-in command, in menu order.
    pub fn builtins() -> Vec<Command> {
        let mut commands = vec![
            Command::NewTab,
            Command::Open,
            Command::Save,
            Command::CloseTab,
            Command::Exit,
            Command::Find,
            Command::Replace,
            Command::Undo,
            Command::Redo,
        ];
        commands.extend(Language::ALL.into_iter().map(Command::SetLanguage));
        commands
    }

    /// Stable id used as the dispatch key.
    pub fn id(&self) -> String {
        match self {
            Command::NewTab => "file.new_tab".to_string(),
            Command::Open => "file.open".to_string(),
            Command::Save => "file.save".to_string(),
            Command::CloseTab => "file.close_tab".to_string(),
            Command::Exit => "file.exit".to_string(),
            Command::Find => "edit.find".to_string(),
            Command::Replace => "edit.replace".to_string(),
            Command::Undo => "edit.undo".to_string(),
            Command::Redo => "edit.redo".to_string(),
            Command::SetLanguage(lang) => format!("language.{}", lang.tag()),
        }
    }

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::NewTab => "New Tab",
            Command::Open => "Open",
            Command::Save => "Save",
            Command::CloseTab => "Close Tab",
            Command::Exit => "Exit",
            Command::Find => "Find",
            Command::Replace => "Replace",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::SetLanguage(lang) => lang.display_name(),
        }
    }
}

/// A dispatchable action.
///
/// `Rc` lets the editor clone a handler out of its own registry before
/// calling it with `&mut self`.
pub type CommandHandler = Rc<dyn Fn(&mut Editor, &mut dyn Prompt) -> CoreResult<CommandOutcome>>;

/// Dispatch table from command id to handler.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in command bound.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for command in Command::builtins() {
            registry.register(command.id(), move |editor, prompt| {
                editor.execute(command, prompt)
            });
        }
        registry
    }

    /// Binds `id` to a handler, replacing any previous binding.
    pub fn register<F>(&mut self, id: impl Into<String>, handler: F)
    where
        F: Fn(&mut Editor, &mut dyn Prompt) -> CoreResult<CommandOutcome> + 'static,
    {
        self.handlers.insert(id.into(), Rc::new(handler));
    }

    /// Returns the handler bound to `id`.
    pub fn get(&self, id: &str) -> Option<CommandHandler> {
        self.handlers.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Returns all registered command ids, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.list())
            .finish()
    }
}
