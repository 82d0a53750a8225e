use std::sync::Arc;

use crate::command::Command;
use crate::dialect::CommandFormatProvider;

/// Parameterless query returning the identity produced by the last insert.
#[derive(Debug, Clone)]
pub struct LastInsertIdCommandBuilder {
    format: Arc<dyn CommandFormatProvider>,
    template: Option<Command>,
}

impl LastInsertIdCommandBuilder {
    #[must_use]
    pub fn new(format: Arc<dyn CommandFormatProvider>) -> Self {
        Self {
            format,
            template: None,
        }
    }

    /// The command, or `None` when the dialect cannot report generated identities.
    pub fn get_command(&mut self) -> Option<&Command> {
        let command = match self.template.take() {
            Some(command) => command,
            None => Command::new(self.format.last_insert_id_query()?),
        };
        Some(self.template.insert(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{CassandraFormat, MssqlFormat};

    #[test]
    fn unsupported_dialects_yield_none() {
        let mut builder = LastInsertIdCommandBuilder::new(Arc::new(CassandraFormat));
        assert!(builder.get_command().is_none());

        let mut builder = LastInsertIdCommandBuilder::new(Arc::new(MssqlFormat));
        assert_eq!(
            builder.get_command().map(Command::text),
            Some("SELECT SCOPE_IDENTITY()")
        );
    }
}
