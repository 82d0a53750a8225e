use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::step::{CommandBatchStep, ResultCallback};
use crate::command::{Command, CommandParameter};
use crate::config::BatchLimits;
use crate::connector::DatabaseConnector;
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::translation::{ParameterMatch, find_parameter_tokens};

/// Why a batch turned a step away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// `max_commands_per_batch` reached.
    StepLimit,
    /// The batch's own, tighter step cap reached.
    LocalStepLimit,
    /// The step's parameters would overflow `max_parameters_per_command`.
    ParameterLimit,
    /// The accumulated text already exceeds `max_command_length`.
    CommandLength,
}

/// Outcome of [`CommandBatch::add`].
///
/// A rejection is not a failure: the step comes back untouched so the caller can
/// execute this batch and offer the step to a fresh one.
#[must_use]
#[derive(Debug)]
pub enum Admission<'a> {
    Admitted,
    Rejected {
        step: CommandBatchStep<'a>,
        reason: RejectReason,
    },
}

impl Admission<'_> {
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Accumulates steps into one multi-statement command bound to a connector.
///
/// ```rust
/// use sql_batcher::prelude::*;
///
/// let connector = SqliteConnector::open_in_memory().unwrap();
/// let mut batch = CommandBatch::new(&connector);
///
/// let mut first = Command::new("DELETE FROM t WHERE id=:id");
/// first.add_parameter(CommandParameter::new(":id", RowValues::Int(1)));
/// let mut second = Command::new("DELETE FROM t WHERE id=:id");
/// second.add_parameter(CommandParameter::new(":id", RowValues::Int(2)));
///
/// assert!(batch.add(CommandBatchStep::new(first)).unwrap().is_admitted());
/// assert!(batch.add(CommandBatchStep::new(second)).unwrap().is_admitted());
/// assert_eq!(
///     batch.get_command().unwrap().text(),
///     "DELETE FROM t WHERE id=:p0;DELETE FROM t WHERE id=:p1;"
/// );
/// ```
pub struct CommandBatch<'a, C: DatabaseConnector + ?Sized> {
    connector: Option<&'a C>,
    format: Option<Arc<dyn CommandFormatProvider>>,
    command: Option<Command>,
    text: String,
    text_chars: usize,
    parameter_count: usize,
    current_count: usize,
    max_count: Option<usize>,
    limits: BatchLimits,
    callbacks: Vec<ResultCallback<'a>>,
    after_execute: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a, C: DatabaseConnector + ?Sized> CommandBatch<'a, C> {
    /// A batch using the connector's own limits.
    #[must_use]
    pub fn new(connector: &'a C) -> Self {
        Self::with_limits(connector, connector.limits())
    }

    #[must_use]
    pub fn with_limits(connector: &'a C, limits: BatchLimits) -> Self {
        Self {
            connector: Some(connector),
            format: Some(connector.format_provider()),
            command: Some(connector.create_command("")),
            text: String::new(),
            text_chars: 0,
            parameter_count: 0,
            current_count: 0,
            max_count: None,
            limits,
            callbacks: Vec::new(),
            after_execute: None,
        }
    }

    /// Cap this batch below the transport's step limit.
    #[must_use]
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    pub fn set_max_count(&mut self, max_count: Option<usize>) {
        self.max_count = max_count;
    }

    /// Run `hook` once, after the next successful [`CommandBatch::execute`].
    pub fn on_after_execute<F>(&mut self, hook: F)
    where
        F: FnOnce() + 'a,
    {
        self.after_execute = Some(Box::new(hook));
    }

    /// Number of admitted steps.
    #[must_use]
    pub fn current_count(&self) -> usize {
        self.current_count
    }

    /// Number of merged parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    #[must_use]
    pub fn max_count(&self) -> Option<usize> {
        self.max_count
    }

    #[must_use]
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.command.is_none()
    }

    /// Try to merge `step` into the batch.
    ///
    /// # Errors
    /// Returns `SqlBatchError::BatchDisposed` after disposal and
    /// `SqlBatchError::ConsistencyError` when the step's text references a parameter its command
    /// does not declare. Neither leaves a partial merge behind.
    pub fn add(&mut self, step: CommandBatchStep<'a>) -> Result<Admission<'a>, SqlBatchError> {
        let format = match (&self.format, &self.command) {
            (Some(format), Some(_)) => Arc::clone(format),
            _ => return Err(SqlBatchError::BatchDisposed),
        };

        let (command, callback) = step.into_parts();
        let matches = find_parameter_tokens(command.text(), format.as_ref());
        let distinct = distinct_tokens(&matches);

        let rejection = if self.current_count >= self.limits.max_commands_per_batch {
            Some(RejectReason::StepLimit)
        } else if self.max_count.is_some_and(|max| self.current_count >= max) {
            Some(RejectReason::LocalStepLimit)
        } else if self.parameter_count + distinct > self.limits.max_parameters_per_command {
            Some(RejectReason::ParameterLimit)
        } else if self.text_chars > self.limits.max_command_length {
            Some(RejectReason::CommandLength)
        } else {
            None
        };
        if let Some(reason) = rejection {
            debug!(?reason, steps = self.current_count, "batch rejected step");
            return Ok(Admission::Rejected {
                step: CommandBatchStep::from_parts(command, callback),
                reason,
            });
        }

        let (text, parameters) = self.rename(&command, &matches, distinct, format.as_ref())?;

        self.text_chars += text.chars().count();
        self.text.push_str(&text);
        self.parameter_count += parameters.len();
        if let Some(merged) = self.command.as_mut() {
            for parameter in parameters {
                merged.add_parameter(parameter);
            }
        }
        if let Some(callback) = callback {
            self.callbacks.push(callback);
        }
        self.current_count += 1;
        debug!(
            steps = self.current_count,
            parameters = self.parameter_count,
            "batch admitted step"
        );
        Ok(Admission::Admitted)
    }

    /// Rewrite one step's text with batch-unique parameter names.
    ///
    /// Tokens are replaced from the end of the text backwards so earlier offsets stay valid.
    /// Names are handed out from a decreasing counter, so the step's parameters end up
    /// contiguous right after those already merged.
    fn rename(
        &self,
        command: &Command,
        matches: &[ParameterMatch<'_>],
        distinct: usize,
        format: &dyn CommandFormatProvider,
    ) -> Result<(String, Vec<CommandParameter>), SqlBatchError> {
        let mut text = command.text().to_string();
        let mut counter = self.parameter_count + distinct;
        let mut renamed: HashMap<&str, String> = HashMap::with_capacity(distinct);
        let mut parameters = Vec::with_capacity(distinct);

        for found in matches.iter().rev() {
            let new_name = if let Some(name) = renamed.get(found.token) {
                name.clone()
            } else {
                let parameter = command.parameter(found.token).ok_or_else(|| {
                    SqlBatchError::ConsistencyError(format!(
                        "parameter {} not found inside the parameters collection",
                        found.token
                    ))
                })?;
                counter -= 1;
                let name = format.parameter_name(&format!("p{counter}"));
                trace!(from = found.token, to = %name, "renaming batch parameter");
                parameters.push(parameter.renamed(name.clone()));
                renamed.insert(found.token, name.clone());
                name
            };
            text.replace_range(found.offset..found.end(), &new_name);
        }
        text.push_str(format.query_separator());

        // assigned highest name first
        parameters.reverse();
        Ok((text, parameters))
    }

    /// The merged command as it stands.
    ///
    /// # Errors
    /// Returns `SqlBatchError::BatchDisposed` after disposal.
    pub fn get_command(&mut self) -> Result<&Command, SqlBatchError> {
        let command = self.command.as_mut().ok_or(SqlBatchError::BatchDisposed)?;
        command.set_text(self.text.as_str());
        Ok(command)
    }

    /// Send the merged command and hand each result set to its callback.
    ///
    /// When the reader runs out of result sets before every callback has run, the remaining
    /// callbacks are skipped and a warning is logged.
    ///
    /// # Errors
    /// Returns `SqlBatchError::BatchDisposed` after disposal; transport and callback errors are
    /// passed through unchanged and the post-execute hook does not fire.
    pub fn execute(&mut self) -> Result<(), SqlBatchError> {
        let connector = self.connector.ok_or(SqlBatchError::BatchDisposed)?;
        let command = self.command.as_mut().ok_or(SqlBatchError::BatchDisposed)?;
        command.set_text(self.text.as_str());

        if self.current_count == 0 {
            debug!("empty batch, nothing sent");
        } else if self.callbacks.is_empty() {
            let affected = connector.execute_non_query(command)?;
            debug!(steps = self.current_count, affected, "executed batch");
        } else {
            let mut reader = connector.execute_reader(command)?;
            let total = self.callbacks.len();
            for (position, callback) in self.callbacks.iter_mut().enumerate() {
                callback(&mut *reader)?;
                if !reader.next_result()? {
                    let consumed = position + 1;
                    if consumed < total {
                        warn!(
                            consumed,
                            skipped = total - consumed,
                            "reader ran out of result sets, remaining callbacks skipped"
                        );
                    }
                    break;
                }
            }
            debug!(steps = self.current_count, callbacks = total, "executed batch with reader");
        }

        if let Some(hook) = self.after_execute.take() {
            hook();
        }
        Ok(())
    }

    /// Release the merged command and every borrowed resource. Idempotent.
    pub fn dispose(&mut self) {
        if self.command.take().is_some() {
            debug!(steps = self.current_count, "disposing command batch");
        }
        self.connector = None;
        self.format = None;
        self.callbacks.clear();
        self.after_execute = None;
    }
}

impl<C: DatabaseConnector + ?Sized> Drop for CommandBatch<'_, C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<C: DatabaseConnector + ?Sized> fmt::Debug for CommandBatch<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBatch")
            .field("text", &self.text)
            .field("current_count", &self.current_count)
            .field("parameter_count", &self.parameter_count)
            .field("max_count", &self.max_count)
            .field("limits", &self.limits)
            .field("callbacks", &self.callbacks.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn distinct_tokens(matches: &[ParameterMatch<'_>]) -> usize {
    let mut seen: Vec<&str> = Vec::with_capacity(matches.len());
    for found in matches {
        if !seen.contains(&found.token) {
            seen.push(found.token);
        }
    }
    seen.len()
}
