use super::{CommandFormatProvider, quote_identifier};

/// `PostgreSQL`: double-quoted identifiers, `@name` parameters, dollar-quoted bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresFormat;

impl CommandFormatProvider for PostgresFormat {
    fn escape_identifier(&self, name: &str) -> String {
        quote_identifier(name, '"', '"')
    }

    fn parameter_name(&self, name: &str) -> String {
        format!("@{name}")
    }

    fn supports_dollar_quotes(&self) -> bool {
        true
    }

    fn last_insert_id_query(&self) -> Option<&'static str> {
        Some("SELECT lastval()")
    }
}
