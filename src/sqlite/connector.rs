use std::sync::Arc;

use rusqlite::Connection;
use tracing::debug;

use super::config::{SqliteOptions, SqliteOptionsBuilder};
use super::executor::execute_statements;
use crate::command::Command;
use crate::config::BatchLimits;
use crate::connector::{DatabaseConnector, DatabaseReader};
use crate::dialect::{CommandFormatProvider, SqliteFormat};
use crate::error::SqlBatchError;
use crate::results::BufferedReader;

/// A [`DatabaseConnector`] over one `rusqlite` connection.
///
/// Merged commands run statement by statement; every row-returning statement becomes one
/// result set of the reader, in text order.
#[derive(Debug)]
pub struct SqliteConnector {
    conn: Connection,
    limits: BatchLimits,
}

impl SqliteConnector {
    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open the database described by `options`.
    ///
    /// # Errors
    /// Returns `SqlBatchError::SqliteError` if the database cannot be opened or initialized.
    pub fn open(options: SqliteOptions) -> Result<Self, SqlBatchError> {
        let conn = if options.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&options.db_path)?
        };
        if options.wal && !options.is_in_memory() {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        debug!(db_path = %options.db_path, "opened sqlite connector");
        Ok(Self {
            conn,
            limits: options.limits,
        })
    }

    /// A private in-memory database with default limits.
    ///
    /// # Errors
    /// Returns `SqlBatchError::SqliteError` if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqlBatchError> {
        Self::open(SqliteOptions::in_memory())
    }

    /// The underlying connection, for schema setup and ad-hoc queries.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DatabaseConnector for SqliteConnector {
    fn format_provider(&self) -> Arc<dyn CommandFormatProvider> {
        Arc::new(SqliteFormat)
    }

    fn limits(&self) -> BatchLimits {
        self.limits
    }

    fn execute_non_query(&self, command: &Command) -> Result<usize, SqlBatchError> {
        let (_, affected) = execute_statements(&self.conn, command)?;
        Ok(affected)
    }

    fn execute_reader(&self, command: &Command) -> Result<Box<dyn DatabaseReader>, SqlBatchError> {
        let (sets, _) = execute_statements(&self.conn, command)?;
        Ok(Box::new(BufferedReader::new(sets)))
    }
}
