use super::{CommandFormatProvider, quote_identifier};

/// SQL Server: bracketed identifiers and `@name` parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlFormat;

impl CommandFormatProvider for MssqlFormat {
    fn escape_identifier(&self, name: &str) -> String {
        quote_identifier(name, '[', ']')
    }

    fn parameter_name(&self, name: &str) -> String {
        format!("@{name}")
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn last_insert_id_query(&self) -> Option<&'static str> {
        Some("SELECT SCOPE_IDENTITY()")
    }

    fn format_bool(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn procedure_call(&self, name: &str, parameter_tokens: &[String]) -> String {
        if parameter_tokens.is_empty() {
            format!("EXEC {}", self.escape_identifier(name))
        } else {
            format!(
                "EXEC {} {}",
                self.escape_identifier(name),
                parameter_tokens.join(",")
            )
        }
    }
}
