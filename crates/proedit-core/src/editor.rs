//! Main editor orchestration.
//!
//! `Editor` is the facade a front end talks to. It owns the tab session,
//! the command table and the event bus; every command resolves the active
//! tab, mutates it, and emits events describing what changed.
//!
//! ## Threading
//!
//! `Editor` lives on the UI thread. Each command runs to completion before
//! the front end dispatches the next event, which is all the consistency
//! the session needs.

use proedit_buffer::Match;
use std::path::{Path, PathBuf};

use crate::command::{Command, CommandRegistry};
use crate::config::Config;
use crate::event::{EditorEvent, EventBus};
use crate::gutter::ScrollSource;
use crate::language::Language;
use crate::menu::MenuBar;
use crate::prompt::Prompt;
use crate::session::{Tab, TabSession};
use crate::{CoreError, CoreResult};

/// How a dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran
    Done,
    /// The user dismissed a prompt; nothing changed
    Cancelled,
    /// The command failed and the user was notified
    Failed,
}

/// The main editor state.
pub struct Editor {
    /// Open tabs
    session: TabSession,

    /// Editor configuration
    config: Config,

    /// Command dispatch table
    commands: CommandRegistry,

    /// Menu bar model
    menu: MenuBar,

    /// Event bus for notifications
    event_bus: EventBus,

    /// Whether the editor should quit
    should_quit: bool,
}

impl Editor {
    /// Creates an editor with one empty tab.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an editor with custom configuration and one empty tab.
    pub fn with_config(config: Config) -> Self {
        let mut editor = Self {
            session: TabSession::new(config.editor.clone()),
            config,
            commands: CommandRegistry::with_builtins(),
            menu: MenuBar::standard(),
            event_bus: EventBus::new(),
            should_quit: false,
        };
        editor.new_tab();
        editor
    }

    // ==================== Dispatch ====================

    /// Runs the command bound to `id`.
    ///
    /// Failures are shown through `prompt.notify_error` and reported as
    /// [`CommandOutcome::Failed`]; the session is left as it was before
    /// the failing step.
    pub fn run(&mut self, id: &str, prompt: &mut dyn Prompt) -> CommandOutcome {
        tracing::debug!("Running command {}", id);
        let result = match self.commands.get(id) {
            Some(handler) => handler(self, prompt),
            None => Err(CoreError::CommandNotFound(id.to_string())),
        };

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("Command {} failed: {}", id, err);
                prompt.notify_error(err.title(), &err.to_string());
                CommandOutcome::Failed
            }
        }
    }

    /// Carries out a built-in command.
    pub fn execute(&mut self, command: Command, prompt: &mut dyn Prompt) -> CoreResult<CommandOutcome> {
        match command {
            Command::NewTab => {
                self.new_tab();
                Ok(CommandOutcome::Done)
            }
            Command::Open => self.open(prompt),
            Command::Save => self.save(prompt),
            Command::CloseTab => {
                self.close_active_tab()?;
                Ok(CommandOutcome::Done)
            }
            Command::Exit => {
                self.exit();
                Ok(CommandOutcome::Done)
            }
            Command::Find => self.find(prompt),
            Command::Replace => self.replace(prompt),
            Command::Undo => {
                self.undo()?;
                Ok(CommandOutcome::Done)
            }
            Command::Redo => {
                self.redo()?;
                Ok(CommandOutcome::Done)
            }
            Command::SetLanguage(language) => {
                self.retag_language(language.tag())?;
                Ok(CommandOutcome::Done)
            }
        }
    }

    // ==================== Tabs ====================

    /// Opens a fresh tab and selects it. Returns its name.
    pub fn new_tab(&mut self) -> String {
        let name = self.session.create_tab().name().to_string();
        self.emit(EditorEvent::TabOpened(name.clone()));
        self.emit(EditorEvent::TabSelected(name.clone()));
        name
    }

    /// Selects a tab by name.
    pub fn select_tab(&mut self, name: &str) -> CoreResult<()> {
        self.session.select_tab(name)?;
        self.emit(EditorEvent::TabSelected(name.to_string()));
        Ok(())
    }

    /// Closes a tab by name without asking to save.
    ///
    /// Closing the last tab opens a new empty one, so there is always an
    /// active tab.
    pub fn close_tab(&mut self, name: &str) -> CoreResult<()> {
        self.session.close_tab(name)?;
        self.emit(EditorEvent::TabClosed(name.to_string()));

        if self.session.is_empty() {
            self.new_tab();
        } else if let Some(selected) = self.session.selected_name() {
            self.emit(EditorEvent::TabSelected(selected.to_string()));
        }
        Ok(())
    }

    /// Closes the active tab.
    pub fn close_active_tab(&mut self) -> CoreResult<()> {
        let name = self.active_tab()?.name().to_string();
        self.close_tab(&name)
    }

    /// Returns the active tab.
    pub fn active_tab(&self) -> CoreResult<&Tab> {
        self.session.active_tab()
    }

    /// Returns the tab session.
    pub fn session(&self) -> &TabSession {
        &self.session
    }

    // ==================== File Operations ====================

    /// Asks for a file and loads it into the active tab.
    pub fn open(&mut self, prompt: &mut dyn Prompt) -> CoreResult<CommandOutcome> {
        let Some(path) = prompt.open_path(&self.config.files.filters) else {
            return Ok(CommandOutcome::Cancelled);
        };
        self.open_path(&path)?;
        Ok(CommandOutcome::Done)
    }

    /// Loads `path` into the active tab, replacing its content.
    pub fn open_path(&mut self, path: &Path) -> CoreResult<()> {
        let tab = self.session.active_tab_mut()?;
        tab.load(path)?;
        let name = tab.name().to_string();
        self.emit(EditorEvent::DocumentLoaded(name));
        self.emit_changed()
    }

    /// Asks where to save the active tab and writes it there.
    pub fn save(&mut self, prompt: &mut dyn Prompt) -> CoreResult<CommandOutcome> {
        let suggested = self
            .active_tab()?
            .document()
            .path()
            .map(Path::to_path_buf);
        let Some(path) = prompt.save_path(&self.config.files.filters, suggested.as_deref()) else {
            return Ok(CommandOutcome::Cancelled);
        };
        self.save_to(&path)?;
        Ok(CommandOutcome::Done)
    }

    /// Writes the active tab to `path`, adding the default extension when
    /// the path has none. Returns the path actually written.
    pub fn save_to(&mut self, path: &Path) -> CoreResult<PathBuf> {
        let path = with_default_extension(path, &self.config.files.default_extension);
        let tab = self.session.active_tab_mut()?;
        tab.save(&path)?;
        let name = tab.name().to_string();
        self.emit(EditorEvent::DocumentSaved(name));
        Ok(path)
    }

    // ==================== Search ====================

    /// Asks for a term and marks every occurrence in the active tab.
    pub fn find(&mut self, prompt: &mut dyn Prompt) -> CoreResult<CommandOutcome> {
        let Some(term) = ask_term(prompt, "Search", "Enter search term:") else {
            return Ok(CommandOutcome::Cancelled);
        };
        self.find_term(&term)?;
        Ok(CommandOutcome::Done)
    }

    /// Marks every occurrence of `term` in the active tab.
    pub fn find_term(&mut self, term: &str) -> CoreResult<Vec<Match>> {
        let tab = self.session.active_tab_mut()?;
        let matches = tab.find(term).to_vec();
        let name = tab.name().to_string();
        self.emit(EditorEvent::HighlightsChanged {
            tab: name,
            matches: matches.len(),
        });
        Ok(matches)
    }

    /// Asks for a term, then its replacement, and replaces all.
    pub fn replace(&mut self, prompt: &mut dyn Prompt) -> CoreResult<CommandOutcome> {
        let Some(term) = ask_term(prompt, "Find and Replace", "Enter search term:") else {
            return Ok(CommandOutcome::Cancelled);
        };
        let Some(replacement) = ask_term(prompt, "Find and Replace", "Enter replacement term:") else {
            return Ok(CommandOutcome::Cancelled);
        };
        self.replace_all(&term, &replacement)?;
        Ok(CommandOutcome::Done)
    }

    /// Replaces every occurrence of `term` in the active tab.
    pub fn replace_all(&mut self, term: &str, replacement: &str) -> CoreResult<usize> {
        let count = self.session.active_tab_mut()?.replace_all(term, replacement);
        tracing::debug!("Replaced {} occurrence(s) of {:?}", count, term);
        self.emit_changed()?;
        Ok(count)
    }

    // ==================== Language ====================

    /// Tags the active tab with a language. The text is never modified.
    pub fn retag_language(&mut self, tag: &str) -> CoreResult<Language> {
        let tab = self.session.active_tab_mut()?;
        let language = tab.retag_language(tag)?;
        let name = tab.name().to_string();
        self.emit(EditorEvent::LanguageChanged {
            tab: name,
            language,
        });
        Ok(language)
    }

    // ==================== Text Editing ====================

    /// Keystroke insert into the active tab.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> CoreResult<()> {
        self.session.active_tab_mut()?.insert(char_idx, text)?;
        self.emit_changed()
    }

    /// Appends typed text at the end of the active tab.
    pub fn type_text(&mut self, text: &str) -> CoreResult<()> {
        self.session.active_tab_mut()?.append(text)?;
        self.emit_changed()
    }

    /// Keystroke delete in the active tab.
    pub fn delete(&mut self, range: std::ops::Range<usize>) -> CoreResult<String> {
        let deleted = self.session.active_tab_mut()?.delete(range)?;
        self.emit_changed()?;
        Ok(deleted)
    }

    /// Undoes the last edit in the active tab.
    pub fn undo(&mut self) -> CoreResult<()> {
        self.session.active_tab_mut()?.undo()?;
        self.emit_changed()
    }

    /// Redoes the last undone edit in the active tab.
    pub fn redo(&mut self) -> CoreResult<()> {
        self.session.active_tab_mut()?.redo()?;
        self.emit_changed()
    }

    // ==================== Scrolling ====================

    /// Scroll that started in the content view.
    pub fn scroll_content(&mut self, fraction: f64) -> CoreResult<f64> {
        self.scroll(ScrollSource::Content, fraction)
    }

    /// Scroll that started in the gutter view.
    pub fn scroll_gutter(&mut self, fraction: f64) -> CoreResult<f64> {
        self.scroll(ScrollSource::Gutter, fraction)
    }

    /// Mouse wheel over either view.
    pub fn wheel(&mut self, delta: i32) -> CoreResult<f64> {
        let tab = self.session.active_tab_mut()?;
        let fraction = tab.scroll_mut().wheel(delta);
        let name = tab.name().to_string();
        self.emit(EditorEvent::Scrolled { tab: name, fraction });
        Ok(fraction)
    }

    fn scroll(&mut self, source: ScrollSource, fraction: f64) -> CoreResult<f64> {
        let tab = self.session.active_tab_mut()?;
        let fraction = tab.scroll_mut().scroll_to(source, fraction);
        let name = tab.name().to_string();
        self.emit(EditorEvent::Scrolled { tab: name, fraction });
        Ok(fraction)
    }

    // ==================== Configuration ====================

    /// Returns the editor configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the menu bar model.
    pub fn menu(&self) -> &MenuBar {
        &self.menu
    }

    /// Returns the command table.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Returns the command table for registering extra commands.
    pub fn commands_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }

    // ==================== Lifecycle ====================

    /// Signals that the editor should quit. Unsaved tabs are not checked.
    pub fn exit(&mut self) {
        if self.has_unsaved_changes() {
            tracing::debug!("Exiting with unsaved tabs");
        }
        self.should_quit = true;
        self.emit(EditorEvent::Quit);
    }

    /// Returns true if the editor should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns true if any tab has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.session.iter().any(|tab| tab.document().is_modified())
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }

    fn emit_changed(&self) -> CoreResult<()> {
        let tab = self.session.active_tab()?;
        self.emit(EditorEvent::DocumentChanged {
            tab: tab.name().to_string(),
            line_count: tab.gutter().line_count(),
        });
        Ok(())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// Asks for a search or replacement term; cancel and empty input both
/// mean "abort".
fn ask_term(prompt: &mut dyn Prompt, title: &str, message: &str) -> Option<String> {
    prompt
        .ask_string(title, message)
        .filter(|term| !term.is_empty())
}

fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() || extension.is_empty() {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}
