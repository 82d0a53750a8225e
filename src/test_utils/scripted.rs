use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::command::{Command, CommandParameter};
use crate::config::BatchLimits;
use crate::connector::{DatabaseConnector, DatabaseReader};
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::results::{BufferedReader, ResultSet};
use crate::types::DatabaseType;

/// Which entry point a recorded command went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionKind {
    NonQuery,
    Reader,
}

/// A command as the connector received it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedCommand {
    pub kind: ExecutionKind,
    pub text: String,
    pub parameters: Vec<CommandParameter>,
}

/// Connector that records every command and replays scripted result sets.
///
/// Each `execute_reader` call consumes the next script pushed with
/// [`ScriptedConnector::push_result_sets`]; with no script left it yields a reader without
/// result sets. `execute_non_query` reports one affected row per statement separator.
#[derive(Debug)]
pub struct ScriptedConnector {
    db_type: DatabaseType,
    limits: BatchLimits,
    scripts: RefCell<VecDeque<Vec<ResultSet>>>,
    executed: RefCell<Vec<ExecutedCommand>>,
    failure: RefCell<Option<String>>,
}

impl ScriptedConnector {
    /// A connector speaking `db_type`'s dialect with its default limits.
    #[must_use]
    pub fn new(db_type: DatabaseType) -> Self {
        Self {
            db_type,
            limits: db_type.default_limits(),
            scripts: RefCell::new(VecDeque::new()),
            executed: RefCell::new(Vec::new()),
            failure: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Queue the result sets returned by the next `execute_reader` call.
    pub fn push_result_sets(&self, sets: Vec<ResultSet>) {
        self.scripts.borrow_mut().push_back(sets);
    }

    /// Make the next execution fail with a transport error carrying `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.failure.borrow_mut() = Some(message.into());
    }

    /// Every command received so far, oldest first.
    #[must_use]
    pub fn executed(&self) -> Vec<ExecutedCommand> {
        self.executed.borrow().clone()
    }

    fn record(&self, kind: ExecutionKind, command: &Command) -> Result<(), SqlBatchError> {
        if let Some(message) = self.failure.borrow_mut().take() {
            return Err(SqlBatchError::transport(std::io::Error::other(message)));
        }
        self.executed.borrow_mut().push(ExecutedCommand {
            kind,
            text: command.text().to_string(),
            parameters: command.parameters().to_vec(),
        });
        Ok(())
    }
}

impl DatabaseConnector for ScriptedConnector {
    fn format_provider(&self) -> Arc<dyn CommandFormatProvider> {
        self.db_type.format_provider()
    }

    fn limits(&self) -> BatchLimits {
        self.limits
    }

    fn execute_non_query(&self, command: &Command) -> Result<usize, SqlBatchError> {
        self.record(ExecutionKind::NonQuery, command)?;
        let separator = self.db_type.format_provider().query_separator();
        Ok(command.text().matches(separator).count())
    }

    fn execute_reader(&self, command: &Command) -> Result<Box<dyn DatabaseReader>, SqlBatchError> {
        self.record(ExecutionKind::Reader, command)?;
        let sets = self.scripts.borrow_mut().pop_front().unwrap_or_default();
        Ok(Box::new(BufferedReader::new(sets)))
    }
}
