//! Interactive questions asked when the command line leaves gaps.
//!
//! The rest of the crate only sees the [`Prompter`] trait; [`TerminalPrompter`]
//! is the terminal-backed implementation used by the binary.

use crate::error::{Error, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    queue,
    style::Stylize,
    terminal::{self, ClearType},
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Source of answers for the interactive questions.
pub trait Prompter {
    /// Asks for a path that must name an existing directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be obtained.
    fn ask_directory_path(&self, message: &str) -> Result<PathBuf>;

    /// Asks for free text; an empty answer yields `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be obtained.
    fn ask_text(&self, message: &str, default: &str) -> Result<String>;

    /// Asks a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be obtained.
    fn ask_confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Lets the user tick any subset of `choices`, starting from `defaults`.
    ///
    /// Returns the ticked choices in their original order.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection is cancelled or the terminal fails.
    fn ask_multi_select(
        &self,
        message: &str,
        choices: &[String],
        defaults: &[String],
    ) -> Result<Vec<String>>;
}

fn prompt_io(e: io::Error) -> Error {
    Error::prompt(e.to_string())
}

/// Prompts on the controlling terminal.
///
/// Line questions read from stdin; the multi-select switches the terminal to
/// raw mode and is driven with the arrow keys, space and enter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(&self, message: &str, hint: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{} {} ", "?".green().bold(), message.bold()).map_err(prompt_io)?;
        if !hint.is_empty() {
            write!(stdout, "{} ", hint.dark_grey()).map_err(prompt_io)?;
        }
        stdout.flush().map_err(prompt_io)?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(prompt_io)?;
        if read == 0 {
            return Err(Error::prompt("input closed"));
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn complain(message: &str) {
        eprintln!("{} {}", ">>".red(), message);
    }
}

impl Prompter for TerminalPrompter {
    fn ask_directory_path(&self, message: &str) -> Result<PathBuf> {
        loop {
            let answer = self.read_line(message, "")?;
            let path = PathBuf::from(answer.trim());

            if path.is_dir() {
                return Ok(path);
            }

            Self::complain(&format!("'{}' is not an existing directory", path.display()));
        }
    }

    fn ask_text(&self, message: &str, default: &str) -> Result<String> {
        let hint = if default.is_empty() {
            String::new()
        } else {
            format!("({default})")
        };

        let answer = self.read_line(message, &hint)?;
        if answer.trim().is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn ask_confirm(&self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };

        loop {
            let answer = self.read_line(message, hint)?;
            match parse_confirm(&answer, default) {
                Some(value) => return Ok(value),
                None => Self::complain("Please answer yes or no"),
            }
        }
    }

    fn ask_multi_select(
        &self,
        message: &str,
        choices: &[String],
        defaults: &[String],
    ) -> Result<Vec<String>> {
        if choices.is_empty() {
            return Ok(Vec::new());
        }

        let mut state = Checklist::new(choices, defaults);
        let mut stdout = io::stdout();
        let _raw = RawModeGuard::enable()?;
        let height = u16::try_from(choices.len() + 1).unwrap_or(u16::MAX);
        let mut drawn = false;

        loop {
            if drawn {
                queue!(stdout, cursor::MoveUp(height)).map_err(prompt_io)?;
            }
            state.draw(&mut stdout, message).map_err(prompt_io)?;
            drawn = true;

            let Event::Key(key) = event::read().map_err(prompt_io)? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Up | KeyCode::Char('k') => state.move_up(),
                KeyCode::Down | KeyCode::Char('j') => state.move_down(),
                KeyCode::Char(' ') => state.toggle(),
                KeyCode::Char('a') => state.toggle_all(),
                KeyCode::Enter => break,
                KeyCode::Esc => return Err(Error::prompt("selection cancelled")),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(Error::prompt("selection cancelled"));
                }
                _ => {}
            }
        }

        Ok(state.into_selected())
    }
}

/// Interprets a yes/no answer; blank means `default`.
fn parse_confirm(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(prompt_io)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Cursor and tick marks of a multi-select list.
struct Checklist<'a> {
    choices: &'a [String],
    selected: Vec<bool>,
    cursor: usize,
}

impl<'a> Checklist<'a> {
    fn new(choices: &'a [String], defaults: &[String]) -> Self {
        Self {
            choices,
            selected: choices.iter().map(|c| defaults.contains(c)).collect(),
            cursor: 0,
        }
    }

    fn move_up(&mut self) {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.choices.len() - 1);
    }

    fn move_down(&mut self) {
        self.cursor = (self.cursor + 1) % self.choices.len();
    }

    fn toggle(&mut self) {
        self.selected[self.cursor] = !self.selected[self.cursor];
    }

    fn toggle_all(&mut self) {
        let all = self.selected.iter().all(|s| *s);
        self.selected.iter_mut().for_each(|s| *s = !all);
    }

    fn into_selected(self) -> Vec<String> {
        self.choices
            .iter()
            .zip(self.selected)
            .filter_map(|(choice, selected)| selected.then(|| choice.clone()))
            .collect()
    }

    fn draw(&self, out: &mut impl Write, message: &str) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::FromCursorDown)
        )?;
        write!(
            out,
            "{} {} {}\r\n",
            "?".green().bold(),
            message.bold(),
            "(space: toggle, a: all, enter: confirm)".dark_grey()
        )?;

        for (i, (choice, selected)) in self.choices.iter().zip(&self.selected).enumerate() {
            let pointer = if i == self.cursor { ">" } else { " " };
            let mark = if *selected { "[x]" } else { "[ ]" };
            if i == self.cursor {
                write!(out, "{} {} {}\r\n", pointer.cyan(), mark, choice.as_str().cyan())?;
            } else {
                write!(out, "{pointer} {mark} {choice}\r\n")?;
            }
        }

        out.flush()
    }
}

/// Answers questions from a fixed script.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompter {
    pub(crate) directory: Option<PathBuf>,
    pub(crate) text: String,
    pub(crate) confirm: bool,
    /// `None` accepts the defaults.
    pub(crate) selection: Option<Vec<String>>,
    pub(crate) offered: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask_directory_path(&self, _message: &str) -> Result<PathBuf> {
        self.directory
            .clone()
            .ok_or_else(|| Error::prompt("no directory scripted"))
    }

    fn ask_text(&self, _message: &str, default: &str) -> Result<String> {
        if self.text.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(self.text.clone())
        }
    }

    fn ask_confirm(&self, _message: &str, _default: bool) -> Result<bool> {
        Ok(self.confirm)
    }

    fn ask_multi_select(
        &self,
        _message: &str,
        choices: &[String],
        defaults: &[String],
    ) -> Result<Vec<String>> {
        *self.offered.borrow_mut() = choices.to_vec();
        Ok(self
            .selection
            .clone()
            .unwrap_or_else(|| defaults.to_vec()))
    }
}
