//! # Console Ports
//!
//! The navigator talks to the terminal through two narrow traits:
//!
//! - [`Presenter`]: everything that is written (headers, command lists,
//!   result summaries). Only `write`/`write_line` are required; the rest
//!   are provided by the [`printer`] functions.
//! - [`LineReader`]: prompted line input, with cancellation.
//!
//! [`CrosstermConsole`] implements both for a real terminal. Tests plug in
//! scripted doubles instead.

pub mod printer;
pub mod render;
mod terminal;

pub use terminal::CrosstermConsole;

use std::fmt;
use std::io;

use crossterm::style::Color;

use crate::core::command::Command;
use crate::core::menu::Menu;
use crate::core::result::CommandResult;

/// Why a prompted read produced no line.
#[derive(Debug)]
pub enum InputError {
    /// The user aborted the request (Esc / Ctrl+C).
    Cancelled,
    /// Input is exhausted (EOF, or Ctrl+D on an empty line).
    Closed,
    Io(io::Error),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Cancelled => write!(f, "input cancelled"),
            InputError::Closed => write!(f, "input closed"),
            InputError::Io(e) => write!(f, "input I/O error: {e}"),
        }
    }
}

impl std::error::Error for InputError {}

impl From<io::Error> for InputError {
    fn from(e: io::Error) -> Self {
        InputError::Io(e)
    }
}

/// Terminal input port.
pub trait LineReader {
    /// Prints `prompt` in `colour` and reads one line, without its line
    /// terminator.
    fn read_line(&mut self, prompt: &str, colour: Color) -> Result<String, InputError>;

    /// Takes back the line left behind by a cancelled read.
    fn retract_line(&mut self) -> io::Result<()>;
}

/// Presentation port.
pub trait Presenter {
    fn write(&mut self, text: &str, colour: Option<Color>) -> io::Result<()>;

    fn write_line(&mut self, text: &str, colour: Option<Color>) -> io::Result<()>;

    fn blank_line(&mut self) -> io::Result<()> {
        self.write_line("", None)
    }

    fn title(&mut self, menu: &Menu) -> io::Result<()> {
        printer::print_title(self, menu)
    }

    fn command_list(&mut self, commands: &[Command]) -> io::Result<()> {
        printer::print_command_list(self, commands)
    }

    /// Printed whenever a menu becomes active.
    fn menu_header(&mut self, menu: &Menu) -> io::Result<()> {
        printer::print_menu_header(self, menu)
    }

    fn command_result(&mut self, result: &CommandResult) -> io::Result<()> {
        printer::print_command_result(self, result)
    }

    /// A failure message, in red.
    fn error_message(&mut self, message: &str) -> io::Result<()> {
        self.write_line(&format!("Error message: {message}"), Some(Color::Red))
    }

    fn unknown_command(&mut self, _input: &str) -> io::Result<()> {
        self.write_line("Unknown command", Some(Color::Red))
    }
}
