//! Per-backend syntax rules: identifier escaping, parameter tokens, statement separators.
//!
//! Everything that differs between backends lives behind [`CommandFormatProvider`], so
//! builders and batches never branch on backend identity:
//! ```rust
//! use sql_batcher::prelude::*;
//!
//! let format = DatabaseType::Mssql.format_provider();
//! assert_eq!(format.escape_identifier("order"), "[order]");
//! assert_eq!(format.parameter_name("id"), "@id");
//! assert_eq!(format.query_separator(), ";");
//! ```

use std::sync::Arc;

use crate::error::SqlBatchError;
use crate::types::{DatabaseType, RowValues};

mod cassandra;
mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use cassandra::CassandraFormat;
pub use mssql::MssqlFormat;
pub use mysql::MysqlFormat;
pub use postgres::PostgresFormat;
pub use sqlite::SqliteFormat;

/// Stateless formatting rules of one SQL dialect.
pub trait CommandFormatProvider: std::fmt::Debug + Send + Sync {
    /// Quote an identifier so it can be used verbatim in a statement.
    fn escape_identifier(&self, name: &str) -> String;

    /// Render the token that references the named parameter inside command text.
    fn parameter_name(&self, name: &str) -> String;

    /// Separator placed after each statement merged into a batch.
    fn query_separator(&self) -> &'static str {
        ";"
    }

    /// Characters that open and close an escaped identifier.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Whether `$tag$ ... $tag$` bodies are string literals in this dialect.
    fn supports_dollar_quotes(&self) -> bool {
        false
    }

    /// Whether `#` starts a line comment.
    fn supports_hash_comments(&self) -> bool {
        false
    }

    /// Whether a backslash escapes the next character inside string literals.
    fn supports_backslash_escapes(&self) -> bool {
        false
    }

    /// Sigil that starts every parameter token.
    fn parameter_prefix(&self) -> String {
        self.parameter_name("")
    }

    /// Query returning the identity generated by the last insert, or `None` when the dialect
    /// has no such query.
    fn last_insert_id_query(&self) -> Option<&'static str> {
        None
    }

    /// Render a boolean literal.
    fn format_bool(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// Render a value as an inline SQL literal.
    ///
    /// Only the literal-list delete uses this path. Text is quoted with doubled single quotes,
    /// which is not a defence against hostile input.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` for values with no literal form (blobs, non-finite
    /// floats).
    fn format_literal(&self, value: &RowValues) -> Result<String, SqlBatchError> {
        match value {
            RowValues::Int(i) => Ok(i.to_string()),
            RowValues::Float(f) if f.is_finite() => Ok(f.to_string()),
            RowValues::Float(f) => Err(SqlBatchError::ArgumentError(format!(
                "{f} has no SQL literal form"
            ))),
            RowValues::Bool(b) => Ok(self.format_bool(*b).to_string()),
            RowValues::Text(s) => Ok(quote_text(s)),
            RowValues::Timestamp(ts) => Ok(quote_text(&ts.format("%Y-%m-%d %H:%M:%S%.f").to_string())),
            RowValues::JSON(json) => Ok(quote_text(&json.to_string())),
            RowValues::Null => Ok("NULL".to_string()),
            RowValues::Blob(_) => Err(SqlBatchError::ArgumentError(
                "binary values cannot be rendered as literals".to_string(),
            )),
        }
    }

    /// Text that invokes a stored routine with the given parameter tokens.
    fn procedure_call(&self, name: &str, parameter_tokens: &[String]) -> String {
        format!(
            "CALL {}({})",
            self.escape_identifier(name),
            parameter_tokens.join(",")
        )
    }
}

impl DatabaseType {
    /// The formatting rules for this backend.
    #[must_use]
    pub fn format_provider(self) -> Arc<dyn CommandFormatProvider> {
        match self {
            DatabaseType::Postgres => Arc::new(PostgresFormat),
            DatabaseType::Sqlite => Arc::new(SqliteFormat),
            DatabaseType::Mssql => Arc::new(MssqlFormat),
            DatabaseType::Mysql => Arc::new(MysqlFormat),
            DatabaseType::Cassandra => Arc::new(CassandraFormat),
        }
    }
}

/// Wrap `name` in `open`/`close`, doubling any embedded closing character.
pub(crate) fn quote_identifier(name: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(open);
    for c in name.chars() {
        if c == close {
            out.push(close);
        }
        out.push(c);
    }
    out.push(close);
    out
}

fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dialect_round_trips_its_prefix() {
        for db in [
            DatabaseType::Postgres,
            DatabaseType::Sqlite,
            DatabaseType::Mssql,
            DatabaseType::Mysql,
            DatabaseType::Cassandra,
        ] {
            let format = db.format_provider();
            let token = format.parameter_name("id");
            assert_eq!(token, format!("{}id", format.parameter_prefix()));
            assert_eq!(format.query_separator(), ";");
        }
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(PostgresFormat.escape_identifier("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(MssqlFormat.escape_identifier("a]b"), "[a]]b]");
        assert_eq!(MysqlFormat.escape_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn literals_are_rendered_per_dialect() {
        assert_eq!(PostgresFormat.format_literal(&RowValues::Bool(true)).unwrap(), "TRUE");
        assert_eq!(MssqlFormat.format_literal(&RowValues::Bool(true)).unwrap(), "1");
        assert_eq!(
            SqliteFormat.format_literal(&RowValues::Text("O'Hara".into())).unwrap(),
            "'O''Hara'"
        );
        assert!(matches!(
            SqliteFormat.format_literal(&RowValues::Blob(vec![0])),
            Err(SqlBatchError::ArgumentError(_))
        ));
    }

    #[test]
    fn last_insert_id_support_varies() {
        assert_eq!(SqliteFormat.last_insert_id_query(), Some("SELECT last_insert_rowid()"));
        assert_eq!(CassandraFormat.last_insert_id_query(), None);
    }
}
