use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that can be bound as command parameters or read back from a result set.
///
/// The same enum is used by every dialect, so builders and batches never branch on the
/// backend:
/// ```rust
/// use sql_batcher::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Naive timestamp; dialects render it as `YYYY-MM-DD HH:MM:SS[.fff]` text.
    Timestamp(NaiveDateTime),
    Null,
    JSON(JsonValue),
    Blob(Vec<u8>),
}

impl RowValues {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers widen to floats.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// `SQLite` stores booleans as 0/1 integers, so those count too.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamps, or text in `YYYY-MM-DD HH:MM:SS[.fff]` form.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(value) => Some(*value),
            Self::Text(text) => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Type tag carried by every command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    Boolean,
    Int16,
    Int32,
    Int64,
    Decimal,
    Double,
    String,
    Date,
    DateTime,
    Binary,
    Json,
    Guid,
}

impl DbType {
    /// Best-effort tag for a bare value, used when callers supply parameters without a column.
    #[must_use]
    pub fn infer(value: &RowValues) -> Self {
        match value {
            RowValues::Int(_) => DbType::Int64,
            RowValues::Float(_) => DbType::Double,
            RowValues::Bool(_) => DbType::Boolean,
            RowValues::Timestamp(_) => DbType::DateTime,
            RowValues::JSON(_) => DbType::Json,
            RowValues::Blob(_) => DbType::Binary,
            RowValues::Text(_) | RowValues::Null => DbType::String,
        }
    }
}

/// The database backends whose SQL dialect is known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `SQLite` database
    Sqlite,
    /// SQL Server database
    Mssql,
    /// `MySQL` / `MariaDB` database
    Mysql,
    /// Cassandra (CQL) database
    Cassandra,
}
