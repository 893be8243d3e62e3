//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crossterm::style::Color;

use crate::console::{InputError, LineReader, Presenter, printer};
use crate::core::menu::Menu;
use crate::core::navigator::Navigator;
use crate::core::result::{CommandResult, CommandStatus};

/// In-memory presenter: keeps coloured spans, finished lines and call counts.
#[derive(Default)]
pub struct Recorder {
    spans: Vec<(String, Option<Color>)>,
    lines: Vec<String>,
    current: String,
    headers: usize,
    results: Vec<CommandStatus>,
    unknown: usize,
}

impl Recorder {
    pub fn spans(&self) -> Vec<(String, Option<Color>)> {
        self.spans.clone()
    }

    /// Completed lines only; a trailing partial line is left out.
    pub fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }
}

impl Presenter for Recorder {
    fn write(&mut self, text: &str, colour: Option<Color>) -> io::Result<()> {
        if !text.is_empty() {
            self.spans.push((text.to_string(), colour));
        }
        self.current.push_str(text);
        Ok(())
    }

    fn write_line(&mut self, text: &str, colour: Option<Color>) -> io::Result<()> {
        self.write(text, colour)?;
        self.lines.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn menu_header(&mut self, menu: &Menu) -> io::Result<()> {
        self.headers += 1;
        printer::print_menu_header(self, menu)
    }

    fn command_result(&mut self, result: &CommandResult) -> io::Result<()> {
        self.results.push(result.status());
        printer::print_command_result(self, result)
    }

    fn unknown_command(&mut self, _input: &str) -> io::Result<()> {
        self.unknown += 1;
        self.write_line("Unknown command", Some(Color::Red))
    }
}

enum Scripted {
    Line(String),
    Cancel,
}

#[derive(Default)]
struct Script {
    pending: VecDeque<Scripted>,
    prompts: Vec<(String, Color)>,
    retracts: usize,
}

/// A console double usable as both ports. Clones share state, so the test
/// keeps a handle while the navigator owns boxed copies.
///
/// When the script runs out, reads report `InputError::Closed`.
#[derive(Clone, Default)]
pub struct TestConsole {
    out: Rc<RefCell<Recorder>>,
    script: Rc<RefCell<Script>>,
}

impl TestConsole {
    pub fn push_line(&self, line: &str) {
        self.script
            .borrow_mut()
            .pending
            .push_back(Scripted::Line(line.to_string()));
    }

    pub fn push_cancel(&self) {
        self.script.borrow_mut().pending.push_back(Scripted::Cancel);
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(Box::new(self.clone()), Box::new(self.clone()))
    }

    pub fn lines(&self) -> Vec<String> {
        self.out.borrow().lines()
    }

    pub fn headers(&self) -> usize {
        self.out.borrow().headers
    }

    pub fn results(&self) -> Vec<CommandStatus> {
        self.out.borrow().results.clone()
    }

    pub fn unknown(&self) -> usize {
        self.out.borrow().unknown
    }

    pub fn prompts(&self) -> Vec<(String, Color)> {
        self.script.borrow().prompts.clone()
    }

    pub fn retracts(&self) -> usize {
        self.script.borrow().retracts
    }

    pub fn remaining_input(&self) -> usize {
        self.script.borrow().pending.len()
    }
}

impl Presenter for TestConsole {
    fn write(&mut self, text: &str, colour: Option<Color>) -> io::Result<()> {
        self.out.borrow_mut().write(text, colour)
    }

    fn write_line(&mut self, text: &str, colour: Option<Color>) -> io::Result<()> {
        self.out.borrow_mut().write_line(text, colour)
    }

    fn menu_header(&mut self, menu: &Menu) -> io::Result<()> {
        self.out.borrow_mut().menu_header(menu)
    }

    fn command_result(&mut self, result: &CommandResult) -> io::Result<()> {
        self.out.borrow_mut().command_result(result)
    }

    fn unknown_command(&mut self, input: &str) -> io::Result<()> {
        self.out.borrow_mut().unknown_command(input)
    }
}

impl LineReader for TestConsole {
    fn read_line(&mut self, prompt: &str, colour: Color) -> Result<String, InputError> {
        let mut script = self.script.borrow_mut();
        script.prompts.push((prompt.to_string(), colour));
        match script.pending.pop_front() {
            Some(Scripted::Line(line)) => Ok(line),
            Some(Scripted::Cancel) => Err(InputError::Cancelled),
            None => Err(InputError::Closed),
        }
    }

    fn retract_line(&mut self) -> io::Result<()> {
        self.script.borrow_mut().retracts += 1;
        Ok(())
    }
}

/// Creates a navigator reading `lines` in order, plus a handle on its console.
pub fn test_navigator(lines: &[&str]) -> (Navigator, TestConsole) {
    let console = TestConsole::default();
    for line in lines {
        console.push_line(line);
    }
    (console.navigator(), console)
}
