use std::fmt;

use crate::command::Command;
use crate::connector::DatabaseReader;
use crate::error::SqlBatchError;

/// Consumes the result set produced by one step.
pub type ResultCallback<'a> =
    Box<dyn FnMut(&mut dyn DatabaseReader) -> Result<(), SqlBatchError> + 'a>;

/// One command queued in a batch, with or without a consumer for its result set.
pub enum CommandBatchStep<'a> {
    /// Contributes text and parameters only; nothing is read back.
    NoResult(Command),
    /// The callback receives the shared reader positioned on this step's result set.
    WithResult {
        command: Command,
        callback: ResultCallback<'a>,
    },
}

impl<'a> CommandBatchStep<'a> {
    #[must_use]
    pub fn new(command: Command) -> Self {
        CommandBatchStep::NoResult(command)
    }

    #[must_use]
    pub fn with_callback<F>(command: Command, callback: F) -> Self
    where
        F: FnMut(&mut dyn DatabaseReader) -> Result<(), SqlBatchError> + 'a,
    {
        CommandBatchStep::WithResult {
            command,
            callback: Box::new(callback),
        }
    }

    #[must_use]
    pub fn command(&self) -> &Command {
        match self {
            CommandBatchStep::NoResult(command) | CommandBatchStep::WithResult { command, .. } => {
                command
            }
        }
    }

    #[must_use]
    pub fn has_callback(&self) -> bool {
        matches!(self, CommandBatchStep::WithResult { .. })
    }

    pub(crate) fn into_parts(self) -> (Command, Option<ResultCallback<'a>>) {
        match self {
            CommandBatchStep::NoResult(command) => (command, None),
            CommandBatchStep::WithResult { command, callback } => (command, Some(callback)),
        }
    }

    pub(crate) fn from_parts(command: Command, callback: Option<ResultCallback<'a>>) -> Self {
        match callback {
            Some(callback) => CommandBatchStep::WithResult { command, callback },
            None => CommandBatchStep::NoResult(command),
        }
    }
}

impl fmt::Debug for CommandBatchStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBatchStep")
            .field("command", self.command())
            .field("has_callback", &self.has_callback())
            .finish()
    }
}
