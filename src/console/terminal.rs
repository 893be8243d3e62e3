//! Crossterm-backed console: coloured output and a small raw-mode line
//! editor with cancellation.
//!
//! Keys while reading a line:
//!
//! ```text
//! printable   insert at end        Enter       submit
//! Backspace   delete last char     Esc/Ctrl+C  cancel
//! Ctrl+D      close (empty line)
//! ```
//!
//! When stdin is not a terminal (piped input), lines are read with plain
//! buffered reads and EOF closes the input.

use std::io::{self, BufRead, IsTerminal, Stdout, Write, stdout};

use crossterm::cursor::{MoveLeft, MoveToPreviousLine};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};
use log::{debug, warn};
use unicode_width::UnicodeWidthChar;

use super::{InputError, LineReader, Presenter};

pub struct CrosstermConsole {
    out: Stdout,
    interactive: bool,
}

impl Default for CrosstermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermConsole {
    pub fn new() -> Self {
        let interactive = io::stdin().is_terminal();
        debug!("Console created (interactive stdin: {interactive})");
        Self {
            out: stdout(),
            interactive,
        }
    }

    fn print(&mut self, text: &str, colour: Option<Color>) -> io::Result<()> {
        match colour {
            Some(c) => queue!(self.out, SetForegroundColor(c), Print(text), ResetColor),
            None => queue!(self.out, Print(text)),
        }
    }

    fn read_piped_line(&mut self) -> Result<String, InputError> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    fn read_interactive_line(&mut self) -> Result<String, InputError> {
        let _raw = RawModeGuard::new()?;
        let mut buffer = String::new();

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }

            match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
                    execute!(self.out, Print("\r\n"))?;
                    return Err(InputError::Cancelled);
                }
                (KeyModifiers::CONTROL, KeyCode::Char('d')) if buffer.is_empty() => {
                    execute!(self.out, Print("\r\n"))?;
                    return Err(InputError::Closed);
                }
                (_, KeyCode::Enter) => {
                    execute!(self.out, Print("\r\n"))?;
                    return Ok(buffer);
                }
                (_, KeyCode::Backspace) => {
                    if let Some(c) = buffer.pop() {
                        let width = c.width().unwrap_or(1) as u16;
                        let blank = " ".repeat(usize::from(width));
                        execute!(self.out, MoveLeft(width), Print(blank), MoveLeft(width))?;
                    }
                }
                (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                    buffer.push(c);
                    execute!(self.out, Print(c))?;
                }
                _ => {}
            }
        }
    }
}

impl Presenter for CrosstermConsole {
    fn write(&mut self, text: &str, colour: Option<Color>) -> io::Result<()> {
        self.print(text, colour)?;
        self.out.flush()
    }

    fn write_line(&mut self, text: &str, colour: Option<Color>) -> io::Result<()> {
        self.print(text, colour)?;
        queue!(self.out, Print("\n"))?;
        self.out.flush()
    }
}

impl LineReader for CrosstermConsole {
    fn read_line(&mut self, prompt: &str, colour: Color) -> Result<String, InputError> {
        self.write(prompt, Some(colour))?;
        if self.interactive {
            self.read_interactive_line()
        } else {
            self.read_piped_line()
        }
    }

    fn retract_line(&mut self) -> io::Result<()> {
        execute!(self.out, MoveToPreviousLine(1), Clear(ClearType::CurrentLine))
    }
}

/// Keeps the terminal in raw mode for the duration of one read.
struct RawModeGuard;

impl RawModeGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
    }
}
