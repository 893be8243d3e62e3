//! # Commands
//!
//! A `Command` is a named, described unit of work bound to a menu. Executing
//! it runs the wrapped action exactly once and records what happened in a
//! [`CommandResult`].
//!
//! ```text
//! Command::execute(nav)
//!   ├── started = now
//!   ├── action(nav)            // runs to completion, synchronously
//!   └── CommandResult { started, ended, cause }
//!          cause = None             → Success
//!          cause = Some(Cancelled)  → Cancelled
//!          cause = Some(InputClosed) → Cancelled, and the run ends
//!          cause = Some(Failed(..)) → Failure
//! ```
//!
//! Nothing is thrown past `execute`. A failing action still yields a result,
//! and the caller decides what a Failure means via
//! [`CommandResult::into_result`] (see `FailurePolicy` in the navigator).

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::console::InputError;
use crate::core::navigator::{NavError, Navigator};
use crate::core::result::CommandResult;

/// The deferred work a command performs.
///
/// Actions receive the navigator they run under, so they can open or close
/// menus, read more input, or flip settings.
pub type Action = Rc<dyn Fn(&mut Navigator) -> Result<(), CommandError>>;

/// Why a command action did not complete normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The user aborted an input request made by the action.
    Cancelled,
    /// Input ran out while the action was reading from it.
    InputClosed,
    /// The command logic itself failed.
    Failed(String),
}

impl CommandError {
    pub fn failed(message: impl Into<String>) -> Self {
        CommandError::Failed(message.into())
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, CommandError::Cancelled)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Cancelled => write!(f, "cancelled by user"),
            CommandError::InputClosed => write!(f, "input closed"),
            CommandError::Failed(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<InputError> for CommandError {
    fn from(e: InputError) -> Self {
        match e {
            InputError::Cancelled => CommandError::Cancelled,
            InputError::Closed => CommandError::InputClosed,
            InputError::Io(e) => CommandError::Failed(e.to_string()),
        }
    }
}

impl From<NavError> for CommandError {
    fn from(e: NavError) -> Self {
        CommandError::Failed(e.to_string())
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError::Failed(e.to_string())
    }
}

/// A named, described, executable unit bound to a menu.
///
/// Cloning is cheap: the action is shared, which lets the navigator run a
/// command while the menu that owns it is being closed.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    action: Action,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Navigator) -> Result<(), CommandError> + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            action: Rc::new(action),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Runs the action once and captures timing and outcome.
    pub fn execute(&self, nav: &mut Navigator) -> CommandResult {
        let recorder = CommandResult::start();
        let outcome = (self.action)(nav);
        let result = recorder.finish(outcome.err());
        debug!(
            "Command '{}' finished: {:?} in {}ms",
            self.name,
            result.status(),
            result.duration().as_millis()
        );
        result
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
