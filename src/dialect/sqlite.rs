use super::{CommandFormatProvider, quote_identifier};

/// `SQLite`: double-quoted identifiers and `:name` parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteFormat;

impl CommandFormatProvider for SqliteFormat {
    fn escape_identifier(&self, name: &str) -> String {
        quote_identifier(name, '"', '"')
    }

    fn parameter_name(&self, name: &str) -> String {
        format!(":{name}")
    }

    fn last_insert_id_query(&self) -> Option<&'static str> {
        Some("SELECT last_insert_rowid()")
    }

    // SQLite has no boolean storage class
    fn format_bool(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }
}
