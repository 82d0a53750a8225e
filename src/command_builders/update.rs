use std::sync::Arc;

use tracing::debug;

use super::{BuilderBase, bind_from_provider};
use crate::command::Command;
use crate::descriptor::{ColumnDescriptor, TableDescriptor};
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::value_provider::ValueProvider;

/// `UPDATE <table> SET <column>=<param>,... WHERE <key>=<param> [AND ...]`.
///
/// The SET list holds every column that is neither a key nor an identity column.
#[derive(Debug, Clone)]
pub struct UpdateCommandBuilder {
    base: BuilderBase,
    // SET columns followed by key columns, matching parameter order
    bound_columns: Vec<ColumnDescriptor>,
    template: Option<Command>,
}

impl UpdateCommandBuilder {
    #[must_use]
    pub fn new(format: Arc<dyn CommandFormatProvider>, descriptor: Arc<TableDescriptor>) -> Self {
        Self {
            base: BuilderBase::new(format, descriptor),
            bound_columns: Vec::new(),
            template: None,
        }
    }

    fn build_template(&mut self) -> Result<Command, SqlBatchError> {
        self.base.require_primary_key("update")?;
        let descriptor = self.base.descriptor.clone();
        let set_columns: Vec<&ColumnDescriptor> = descriptor
            .all_columns()
            .iter()
            .filter(|c| !c.is_primary_key && !c.is_identity)
            .collect();
        if set_columns.is_empty() {
            return Err(SqlBatchError::ArgumentError(format!(
                "table {} has no updatable columns",
                descriptor.table_name()
            )));
        }
        debug!(table = descriptor.table_name(), "building update template");

        let assignments = set_columns
            .iter()
            .map(|c| {
                format!(
                    "{}={}",
                    self.base.format.escape_identifier(&c.column_name),
                    self.base.parameter_token(c)
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        let mut command = Command::new(format!(
            "UPDATE {} SET {} WHERE {}",
            self.base.table_name(),
            assignments,
            self.base.key_predicate()
        ));

        self.bound_columns = set_columns
            .into_iter()
            .chain(descriptor.primary_key_columns())
            .cloned()
            .collect();
        self.base
            .populate_parameters(&mut command, &self.bound_columns);
        Ok(command)
    }

    /// Bind the provider's current row and return the command.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` if the table has no primary key or no updatable
    /// column, the provider has no current row, or the row lacks a column.
    pub fn get_command(&mut self, provider: &dyn ValueProvider) -> Result<&Command, SqlBatchError> {
        let command = match self.template.take() {
            Some(command) => command,
            None => self.build_template()?,
        };
        let command = self.template.insert(command);
        bind_from_provider(command, &self.bound_columns, provider)?;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::dialect::PostgresFormat;
    use crate::types::{DbType, RowValues};
    use crate::value_provider::EntityValueProvider;

    #[test]
    fn sets_non_key_columns_and_filters_on_keys() {
        let table = TableDescriptor::builder("SimpleTable")
            .column(ColumnDescriptor::new("Id", DbType::Int32).primary_key())
            .column(ColumnDescriptor::new("Name", DbType::String))
            .column(ColumnDescriptor::new("IsActive", DbType::Boolean))
            .build()
            .unwrap();
        let mut builder = UpdateCommandBuilder::new(Arc::new(PostgresFormat), table);
        let mut provider = EntityValueProvider::new(vec![HashMap::from([
            ("Id".to_string(), RowValues::Int(723)),
            ("Name".to_string(), RowValues::Text("John Doe".into())),
            ("IsActive".to_string(), RowValues::Bool(true)),
        ])]);
        provider.move_next();

        let command = builder.get_command(&provider).unwrap();
        assert_eq!(
            command.text(),
            r#"UPDATE "SimpleTable" SET "Name"=@Name,"IsActive"=@IsActive WHERE "Id"=@Id"#
        );
        assert_eq!(
            command.values(),
            vec![
                RowValues::Text("John Doe".into()),
                RowValues::Bool(true),
                RowValues::Int(723)
            ]
        );
    }

    #[test]
    fn key_only_tables_cannot_be_updated() {
        let table = TableDescriptor::builder("links")
            .column(ColumnDescriptor::new("a", DbType::Int32).primary_key())
            .column(ColumnDescriptor::new("b", DbType::Int32).primary_key())
            .build()
            .unwrap();
        let mut builder = UpdateCommandBuilder::new(Arc::new(PostgresFormat), table);
        let provider = EntityValueProvider::<HashMap<String, RowValues>>::new(vec![]);
        assert!(matches!(
            builder.get_command(&provider),
            Err(SqlBatchError::ArgumentError(_))
        ));
    }
}
