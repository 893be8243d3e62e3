//! clinav: console applications as a navigable tree of menus.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod console;
pub mod core;

#[cfg(test)]
pub mod test_support;

pub use crate::console::{CrosstermConsole, InputError, LineReader, Presenter};
pub use crate::core::command::{Command, CommandError};
pub use crate::core::events::NavEvent;
pub use crate::core::menu::{Menu, MenuError, MenuEvent, MenuId, MenuParam, MenuStyle, MenuType};
pub use crate::core::navigator::{NavError, NavState, Navigator};
pub use crate::core::result::{CommandResult, CommandStatus};

/// What a failed command does to the running session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the failure, close every menu and return it from `start`.
    #[default]
    Propagate,
    /// Report the failure and return to the prompt.
    Report,
}
