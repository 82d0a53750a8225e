use tracing::debug;

use super::batch::{Admission, CommandBatch, RejectReason};
use super::step::CommandBatchStep;
use crate::config::BatchLimits;
use crate::connector::DatabaseConnector;
use crate::error::SqlBatchError;

/// Feeds an unbounded stream of steps through as many batches as the limits require.
///
/// Pending steps are only sent by a rotation or by [`BatchManager::flush`]; a manager dropped
/// without flushing discards whatever its current batch holds.
pub struct BatchManager<'a, C: DatabaseConnector + ?Sized> {
    connector: &'a C,
    limits: BatchLimits,
    max_count: Option<usize>,
    current: Option<CommandBatch<'a, C>>,
    executed_batches: usize,
}

impl<'a, C: DatabaseConnector + ?Sized> BatchManager<'a, C> {
    #[must_use]
    pub fn new(connector: &'a C) -> Self {
        Self::with_limits(connector, connector.limits())
    }

    #[must_use]
    pub fn with_limits(connector: &'a C, limits: BatchLimits) -> Self {
        Self {
            connector,
            limits,
            max_count: None,
            current: None,
            executed_batches: 0,
        }
    }

    /// Apply a local step cap to every batch this manager opens.
    #[must_use]
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Batches executed so far, rotations and flushes included.
    #[must_use]
    pub fn executed_batches(&self) -> usize {
        self.executed_batches
    }

    /// Steps waiting in the current batch.
    #[must_use]
    pub fn pending_steps(&self) -> usize {
        self.current.as_ref().map_or(0, CommandBatch::current_count)
    }

    /// Queue `step`, executing the current batch first if it cannot take it.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` when even an empty batch rejects the step, and
    /// passes through merge and transport errors unchanged.
    pub fn add(&mut self, step: CommandBatchStep<'a>) -> Result<(), SqlBatchError> {
        let batch = self.current_batch();
        let was_empty = batch.current_count() == 0;
        let Admission::Rejected { step, reason } = batch.add(step)? else {
            return Ok(());
        };
        if was_empty {
            return Err(never_fits(reason));
        }
        debug!(?reason, "rotating command batch");
        self.finish_current()?;

        match self.current_batch().add(step)? {
            Admission::Admitted => Ok(()),
            Admission::Rejected { reason, .. } => Err(never_fits(reason)),
        }
    }

    /// Execute and dispose whatever batch remains.
    ///
    /// # Errors
    /// Transport and callback errors, passed through unchanged.
    pub fn flush(&mut self) -> Result<(), SqlBatchError> {
        self.finish_current()
    }

    fn current_batch(&mut self) -> &mut CommandBatch<'a, C> {
        let batch = match self.current.take() {
            Some(batch) => batch,
            None => {
                let batch = CommandBatch::with_limits(self.connector, self.limits);
                match self.max_count {
                    Some(max_count) => batch.with_max_count(max_count),
                    None => batch,
                }
            }
        };
        self.current.insert(batch)
    }

    fn finish_current(&mut self) -> Result<(), SqlBatchError> {
        let Some(mut batch) = self.current.take() else {
            return Ok(());
        };
        let result = batch.execute();
        batch.dispose();
        if result.is_ok() {
            self.executed_batches += 1;
        }
        result
    }
}

fn never_fits(reason: RejectReason) -> SqlBatchError {
    SqlBatchError::ArgumentError(format!("step does not fit in an empty batch ({reason:?})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandParameter};
    use crate::test_utils::ScriptedConnector;
    use crate::types::{DatabaseType, RowValues};

    fn insert(value: i64) -> CommandBatchStep<'static> {
        let mut command = Command::new("INSERT INTO t (v) VALUES (:v)");
        command.add_parameter(CommandParameter::new(":v", RowValues::Int(value)));
        CommandBatchStep::new(command)
    }

    #[test]
    fn rotates_when_the_local_cap_is_hit() {
        let connector = ScriptedConnector::new(DatabaseType::Sqlite);
        let mut manager = BatchManager::new(&connector).with_max_count(2);
        for value in 0..5 {
            manager.add(insert(value)).unwrap();
        }
        assert_eq!(manager.executed_batches(), 2);
        assert_eq!(manager.pending_steps(), 1);

        manager.flush().unwrap();
        assert_eq!(manager.executed_batches(), 3);

        let executed = connector.executed();
        assert_eq!(executed.len(), 3);
        assert_eq!(
            executed[0].text,
            "INSERT INTO t (v) VALUES (:p0);INSERT INTO t (v) VALUES (:p1);"
        );
        assert_eq!(executed[2].text, "INSERT INTO t (v) VALUES (:p0);");
        assert_eq!(executed[2].parameters[0].value, RowValues::Int(4));
    }

    #[test]
    fn step_too_large_for_an_empty_batch_is_an_argument_error() {
        let connector = ScriptedConnector::new(DatabaseType::Sqlite).with_limits(
            BatchLimits::builder()
                .max_parameters_per_command(1)
                .finish()
                .unwrap(),
        );
        let mut manager = BatchManager::new(&connector);
        let mut command = Command::new("UPDATE t SET a=:a WHERE b=:b");
        command.add_parameter(CommandParameter::new(":a", RowValues::Int(1)));
        command.add_parameter(CommandParameter::new(":b", RowValues::Int(2)));

        let err = manager.add(CommandBatchStep::new(command)).unwrap_err();
        assert!(matches!(err, SqlBatchError::ArgumentError(_)));
        assert_eq!(manager.executed_batches(), 0);
    }

    #[test]
    fn flush_without_steps_sends_nothing() {
        let connector = ScriptedConnector::new(DatabaseType::Postgres);
        let mut manager = BatchManager::new(&connector);
        manager.flush().unwrap();
        assert_eq!(manager.executed_batches(), 0);
        assert!(connector.executed().is_empty());
    }
}
