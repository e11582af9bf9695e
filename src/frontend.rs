//! Line-oriented terminal front end.
//!
//! Each input line is either typed text (appended to the active tab) or a
//! `:`-prefixed directive. Menu paths such as `:File/Open` and command ids
//! such as `:edit.find` both go through the editor's command table, so the
//! terminal never carries out a command itself.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use proedit_core::event::drain;
use proedit_core::{CommandOutcome, Editor, EditorEvent, FileFilter, Prompt, Tab};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Text to append to the active tab, newline included
    Text(String),
    /// A menu path or command id
    Run(String),
    /// Switch to a tab by name
    Select(String),
    /// Scroll the content view to a fraction
    Scroll(f64),
    /// Scroll the gutter view to a fraction
    ScrollGutter(f64),
    /// Raw wheel delta
    Wheel(i32),
    /// Print the visible window with line numbers
    Show,
    /// List tabs
    Tabs,
    Help,
    /// Unparseable directive, with the reason
    Invalid(String),
}

impl Input {
    pub fn parse(line: &str) -> Input {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(directive) = line.strip_prefix(':') else {
            return Input::Text(format!("{line}\n"));
        };

        let (head, rest) = match directive.split_once(' ') {
            Some((head, rest)) => (head, rest.trim()),
            None => (directive, ""),
        };

        match head {
            "tab" if !rest.is_empty() => Input::Select(rest.to_string()),
            "scroll" => parse_arg(rest, Input::Scroll),
            "gutter" => parse_arg(rest, Input::ScrollGutter),
            "wheel" => parse_arg(rest, Input::Wheel),
            "show" => Input::Show,
            "tabs" => Input::Tabs,
            "help" => Input::Help,
            "q" | "quit" => Input::Run("file.exit".to_string()),
            // `:File/New Tab` contains a space, so take the whole directive
            _ if !directive.trim().is_empty() => Input::Run(directive.trim().to_string()),
            _ => Input::Invalid("empty directive".to_string()),
        }
    }
}

fn parse_arg<T: std::str::FromStr>(arg: &str, wrap: impl FnOnce(T) -> Input) -> Input {
    match arg.parse() {
        Ok(value) => wrap(value),
        Err(_) => Input::Invalid(format!("bad argument: {arg:?}")),
    }
}

/// Prompts and output over a pair of streams.
pub struct Terminal<R, W> {
    input: R,
    output: W,
    gutter_width: usize,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W, gutter_width: usize) -> Self {
        Self {
            input,
            output,
            gutter_width,
        }
    }

    /// Reads one line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Asks a question; an empty answer or end of input counts as cancel.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        Ok(self.read_line()?.filter(|answer| !answer.is_empty()))
    }

    /// Runs the read-dispatch loop until exit or end of input.
    pub fn run(&mut self, editor: &mut Editor) -> io::Result<()> {
        let mut events = editor.subscribe();
        self.write_tab_bar(editor)?;

        while !editor.should_quit() {
            let Some(line) = self.read_line()? else {
                break;
            };
            self.dispatch(editor, Input::parse(&line))?;

            for event in drain(&mut events) {
                self.report(editor, &event)?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, editor: &mut Editor, input: Input) -> io::Result<()> {
        let result = match input {
            Input::Text(text) => editor.type_text(&text).map(drop),
            Input::Run(target) => {
                let id = editor
                    .menu()
                    .resolve(&target)
                    .map(str::to_string)
                    .unwrap_or(target);
                if editor.run(&id, &mut *self) == CommandOutcome::Cancelled {
                    writeln!(self.output, "Cancelled.")?;
                }
                Ok(())
            }
            Input::Select(name) => editor.select_tab(&name),
            Input::Scroll(fraction) => editor.scroll_content(fraction).map(drop),
            Input::ScrollGutter(fraction) => editor.scroll_gutter(fraction).map(drop),
            Input::Wheel(delta) => editor.wheel(delta).map(drop),
            Input::Show => {
                if let Ok(tab) = editor.active_tab() {
                    let view = render_view(tab, self.gutter_width);
                    writeln!(self.output, "{view}")?;
                }
                Ok(())
            }
            Input::Tabs => return self.write_tab_bar(editor),
            Input::Help => return self.write_help(editor),
            Input::Invalid(reason) => {
                writeln!(self.output, "{reason}")?;
                Ok(())
            }
        };

        if let Err(err) = result {
            self.notify_error(err.title(), &err.to_string());
        }
        Ok(())
    }

    fn report(&mut self, editor: &Editor, event: &EditorEvent) -> io::Result<()> {
        match event {
            EditorEvent::TabOpened(_) | EditorEvent::TabClosed(_) | EditorEvent::TabSelected(_) => {
                self.write_tab_bar(editor)
            }
            EditorEvent::DocumentLoaded(tab) => writeln!(self.output, "Loaded into {tab}."),
            EditorEvent::DocumentSaved(tab) => writeln!(self.output, "Saved {tab}."),
            EditorEvent::HighlightsChanged { matches, .. } => {
                writeln!(self.output, "{matches} match(es).")?;
                if let Ok(tab) = editor.active_tab() {
                    for m in tab.highlights() {
                        writeln!(self.output, "  {}..{}", m.start, m.end)?;
                    }
                }
                Ok(())
            }
            EditorEvent::LanguageChanged { tab, language } => {
                writeln!(self.output, "{tab} is now {language}.")
            }
            EditorEvent::Scrolled { fraction, .. } => {
                writeln!(self.output, "At {:.0}%.", fraction * 100.0)
            }
            EditorEvent::DocumentChanged { .. } | EditorEvent::Quit => Ok(()),
        }
    }

    fn write_tab_bar(&mut self, editor: &Editor) -> io::Result<()> {
        let selected = editor.session().selected_name();
        let labels: Vec<String> = editor
            .session()
            .iter()
            .map(|tab| {
                if Some(tab.name()) == selected {
                    format!("[{}]", tab.label())
                } else {
                    tab.label()
                }
            })
            .collect();
        writeln!(self.output, "{}", labels.join(" "))
    }

    fn write_help(&mut self, editor: &Editor) -> io::Result<()> {
        writeln!(self.output, "Lines not starting with ':' are typed into the active tab.")?;
        writeln!(
            self.output,
            ":tab NAME | :tabs | :show | :scroll F | :gutter F | :wheel DELTA | :q"
        )?;
        for menu in &editor.menu().menus {
            let items: Vec<&str> = menu
                .items
                .iter()
                .filter_map(|item| match item {
                    proedit_core::MenuItem::Action { label, .. } => Some(label.as_str()),
                    proedit_core::MenuItem::Separator => None,
                })
                .collect();
            writeln!(self.output, ":{}/{{{}}}", menu.title, items.join(", "))?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompt for Terminal<R, W> {
    fn open_path(&mut self, filters: &[FileFilter]) -> Option<PathBuf> {
        let patterns = filter_summary(filters);
        self.ask(&format!("Open file ({patterns}):"))
            .ok()
            .flatten()
            .map(PathBuf::from)
    }

    fn save_path(&mut self, filters: &[FileFilter], suggested: Option<&Path>) -> Option<PathBuf> {
        let patterns = filter_summary(filters);
        let question = match suggested {
            Some(path) => format!("Save as ({patterns}) [{}]:", path.display()),
            None => format!("Save as ({patterns}):"),
        };
        self.ask(&question).ok().flatten().map(PathBuf::from)
    }

    fn ask_string(&mut self, title: &str, message: &str) -> Option<String> {
        write!(self.output, "{title}: {message} ").ok()?;
        self.output.flush().ok()?;
        self.read_line().ok().flatten()
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        if let Err(err) = writeln!(self.output, "{title}: {message}") {
            tracing::warn!("Could not show error {:?}: {}", message, err);
        }
    }
}

fn filter_summary(filters: &[FileFilter]) -> String {
    filters
        .iter()
        .map(|filter| format!("{} {}", filter.name, filter.pattern()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The visible window: right-aligned gutter numbers beside the text.
pub fn render_view(tab: &Tab, gutter_width: usize) -> String {
    let range = tab.scroll().visible_range();
    let numbers = tab.gutter().render_range(range.clone(), gutter_width);
    let text = tab.document().text();
    let lines = text
        .split('\n')
        .skip(range.start() - 1)
        .take(range.end() - range.start() + 1);

    numbers
        .lines()
        .zip(lines)
        .map(|(number, line)| format!("{number} | {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn terminal(script: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(script.as_bytes().to_vec()), Vec::new(), 4)
    }

    fn output(term: &Terminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&term.output).into_owned()
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(Input::parse("hello"), Input::Text("hello\n".into()));
        assert_eq!(Input::parse(":File/New Tab"), Input::Run("File/New Tab".into()));
        assert_eq!(Input::parse(":edit.find"), Input::Run("edit.find".into()));
        assert_eq!(Input::parse(":tab Untitled-2"), Input::Select("Untitled-2".into()));
        assert_eq!(Input::parse(":scroll 0.5"), Input::Scroll(0.5));
        assert_eq!(Input::parse(":wheel -120"), Input::Wheel(-120));
        assert_eq!(Input::parse(":q"), Input::Run("file.exit".into()));
        assert!(matches!(Input::parse(":wheel lots"), Input::Invalid(_)));
        assert!(matches!(Input::parse(":"), Input::Invalid(_)));
    }

    #[test]
    fn test_typed_text_and_find() {
        let mut editor = Editor::new();
        let mut term = terminal("one fish\ntwo fish\n:Edit/Find\nfish\n:q\n");
        term.run(&mut editor).unwrap();

        let tab = editor.active_tab().unwrap();
        assert_eq!(tab.document().text(), "one fish\ntwo fish\n");
        let out = output(&term);
        assert!(out.contains("2 match(es)."));
        assert!(out.contains("  4..8"));
        assert!(editor.should_quit());
    }

    #[test]
    fn test_empty_replacement_cancels() {
        let mut editor = Editor::new();
        let mut term = terminal("a-b-c\n:edit.replace\n-\n\n");
        term.run(&mut editor).unwrap();
        assert_eq!(editor.active_tab().unwrap().document().text(), "a-b-c\n");
        assert!(output(&term).contains("Cancelled."));
    }

    #[test]
    fn test_cancelled_open_at_end_of_input() {
        let mut editor = Editor::new();
        let mut term = terminal(":File/Open\n");
        term.run(&mut editor).unwrap();
        assert!(output(&term).contains("Cancelled."));
    }

    #[test]
    fn test_save_and_error_reporting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes");
        let script = format!("hello\n:File/Save\n{}\n:Language/Ruby\n", path.display());

        let mut editor = Editor::new();
        let mut term = terminal(&script);
        term.run(&mut editor).unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "hello\n");
        assert!(output(&term).contains("Unknown command: Command not found: Language/Ruby"));
    }

    #[test]
    fn test_tab_bar_marks_selection() {
        let mut editor = Editor::new();
        let mut term = terminal(":File/New Tab\n:tab Untitled-1\nx\n:tabs\n");
        term.run(&mut editor).unwrap();
        assert!(output(&term).ends_with("[*Untitled-1] Untitled-2\n"));
    }

    #[test]
    fn test_render_view_follows_scroll() {
        let mut editor = Editor::new();
        let text: String = (1..=100).map(|i| format!("line {i}\n")).collect();
        editor.type_text(&text).unwrap();
        editor.scroll_content(0.5).unwrap();

        let view = render_view(editor.active_tab().unwrap(), 4);
        let first = view.lines().next().unwrap();
        assert_eq!(first, "  51 | line 51");
        assert_eq!(view.lines().count(), 30);
    }

    proptest! {
        #[test]
        fn plain_lines_are_typed_verbatim(line in "[^:\r\n][^\r\n]{0,40}") {
            prop_assert_eq!(Input::parse(&line), Input::Text(format!("{line}\n")));
        }
    }
}
