use std::sync::Arc;

use tracing::debug;

use super::BuilderBase;
use crate::command::Command;
use crate::descriptor::TableDescriptor;
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::types::RowValues;

/// `SELECT <all columns> FROM <table> WHERE <key>=<param> [AND ...]`.
#[derive(Debug, Clone)]
pub struct SelectOneCommandBuilder {
    base: BuilderBase,
    template: Option<Command>,
}

impl SelectOneCommandBuilder {
    #[must_use]
    pub fn new(format: Arc<dyn CommandFormatProvider>, descriptor: Arc<TableDescriptor>) -> Self {
        Self {
            base: BuilderBase::new(format, descriptor),
            template: None,
        }
    }

    fn build_template(&self) -> Command {
        let descriptor = &self.base.descriptor;
        debug!(table = descriptor.table_name(), "building select-one template");
        let mut command = Command::new(format!(
            "SELECT {} FROM {} WHERE {}",
            self.base.column_list(descriptor.all_columns()),
            self.base.table_name(),
            self.base.key_predicate()
        ));
        self.base
            .populate_parameters(&mut command, descriptor.primary_key_columns());
        command
    }

    /// Bind `ids` positionally, in primary-key order, and return the command.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` if the table has no primary key or `ids` does not
    /// hold exactly one value per key column. The previous binding is left untouched.
    pub fn get_command(&mut self, ids: &[RowValues]) -> Result<&Command, SqlBatchError> {
        self.base.require_primary_key("select one")?;
        let key_count = self.base.descriptor.primary_key_columns().len();
        if ids.len() != key_count {
            return Err(SqlBatchError::ArgumentError(format!(
                "the id count ({}) does not match the entity primary key count ({key_count})",
                ids.len()
            )));
        }

        let command = match self.template.take() {
            Some(command) => command,
            None => self.build_template(),
        };
        let command = self.template.insert(command);
        for (index, id) in ids.iter().enumerate() {
            if let Some(parameter) = command.parameter_at_mut(index) {
                parameter.value = id.clone();
            }
        }
        Ok(command)
    }
}
