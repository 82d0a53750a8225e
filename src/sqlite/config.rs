use crate::config::BatchLimits;
use crate::error::SqlBatchError;
use crate::types::DatabaseType;

use super::connector::SqliteConnector;

/// Path used for a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Options for opening a [`SqliteConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub db_path: String,
    pub limits: BatchLimits,
    /// Switch file databases to write-ahead logging on open.
    pub wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            limits: DatabaseType::Sqlite.default_limits(),
            wal: true,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    #[must_use]
    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path == IN_MEMORY
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn limits(mut self, limits: BatchLimits) -> Self {
        self.opts.limits = limits;
        self
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    /// Validate the limits and return the options.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` for an empty path or a zero limit.
    pub fn finish(self) -> Result<SqliteOptions, SqlBatchError> {
        if self.opts.db_path.is_empty() {
            return Err(SqlBatchError::ConfigError(
                "sqlite database path must not be empty".to_string(),
            ));
        }
        self.opts.limits.validate()?;
        Ok(self.opts)
    }

    /// Open a connector with these options.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` for invalid options and
    /// `SqlBatchError::SqliteError` if the database cannot be opened.
    pub fn build(self) -> Result<SqliteConnector, SqlBatchError> {
        SqliteConnector::open(self.finish()?)
    }
}
