use super::{CommandFormatProvider, quote_identifier};

/// `MySQL` and `MariaDB`: backtick identifiers and `@name` parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlFormat;

impl CommandFormatProvider for MysqlFormat {
    fn escape_identifier(&self, name: &str) -> String {
        quote_identifier(name, '`', '`')
    }

    fn parameter_name(&self, name: &str) -> String {
        format!("@{name}")
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn supports_hash_comments(&self) -> bool {
        true
    }

    fn supports_backslash_escapes(&self) -> bool {
        true
    }

    fn last_insert_id_query(&self) -> Option<&'static str> {
        Some("SELECT LAST_INSERT_ID()")
    }
}
