use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

#[derive(Debug, Error)]
pub enum SqlBatchError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    /// Opaque failure raised by a custom connector's transport.
    #[error(transparent)]
    TransportError(Box<dyn std::error::Error + Send + Sync>),

    #[error("Argument error: {0}")]
    ArgumentError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The merged command text references a parameter that was never declared.
    #[error("Consistency error: {0}")]
    ConsistencyError(String),

    #[error("Result set {position} of {expected} is missing from the reader")]
    MissingResultSet { position: usize, expected: usize },

    #[error("The command batch has been disposed")]
    BatchDisposed,

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl SqlBatchError {
    /// Wrap an error coming out of a connector's transport.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SqlBatchError::TransportError(Box::new(err))
    }
}

impl From<serde_json::Error> for SqlBatchError {
    fn from(err: serde_json::Error) -> Self {
        SqlBatchError::ConfigError(format!("Invalid configuration document: {err}"))
    }
}
