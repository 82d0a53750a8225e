use super::{CommandFormatProvider, quote_identifier};

/// Cassandra CQL: double-quoted identifiers and `:name` markers. There is no identity column
/// concept, so no last-insert-id query exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CassandraFormat;

impl CommandFormatProvider for CassandraFormat {
    fn escape_identifier(&self, name: &str) -> String {
        quote_identifier(name, '"', '"')
    }

    fn parameter_name(&self, name: &str) -> String {
        format!(":{name}")
    }
}
