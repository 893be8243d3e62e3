//! # Command Results
//!
//! Immutable record of one command execution: when it started, when it
//! ended, and what (if anything) went wrong. The status is never stored; it
//! is derived from the captured cause.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeDelta};

use crate::core::command::CommandError;

/// Outcome classification of a command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    started_at: DateTime<Local>,
    ended_at: DateTime<Local>,
    cause: Option<CommandError>,
}

/// Captures the start of an execution. Elapsed time comes from a monotonic
/// clock, so a result never ends before it started.
pub(crate) struct Stopwatch {
    started_at: DateTime<Local>,
    started: Instant,
}

impl Stopwatch {
    pub(crate) fn finish(self, cause: Option<CommandError>) -> CommandResult {
        let elapsed =
            TimeDelta::from_std(self.started.elapsed()).unwrap_or_else(|_| TimeDelta::zero());
        let ended_at = self
            .started_at
            .checked_add_signed(elapsed)
            .unwrap_or(self.started_at);
        CommandResult::new(self.started_at, ended_at, cause)
    }
}

impl CommandResult {
    pub(crate) fn start() -> Stopwatch {
        Stopwatch {
            started_at: Local::now(),
            started: Instant::now(),
        }
    }

    /// Builds a result from explicit timestamps. An end before the start is
    /// clamped to the start.
    pub fn new(
        started_at: DateTime<Local>,
        ended_at: DateTime<Local>,
        cause: Option<CommandError>,
    ) -> Self {
        Self {
            started_at,
            ended_at: ended_at.max(started_at),
            cause,
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn ended_at(&self) -> DateTime<Local> {
        self.ended_at
    }

    pub fn duration(&self) -> Duration {
        (self.ended_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    pub fn cause(&self) -> Option<&CommandError> {
        self.cause.as_ref()
    }

    pub fn status(&self) -> CommandStatus {
        match &self.cause {
            None => CommandStatus::Success,
            Some(CommandError::Cancelled | CommandError::InputClosed) => {
                CommandStatus::Cancelled
            }
            Some(CommandError::Failed(_)) => CommandStatus::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == CommandStatus::Success
    }

    /// Hands a Failure back to the caller as an error; Success and
    /// Cancelled pass through.
    pub fn into_result(self) -> Result<CommandResult, CommandError> {
        match self.cause {
            Some(CommandError::Failed(msg)) => Err(CommandError::Failed(msg)),
            _ => Ok(self),
        }
    }
}
