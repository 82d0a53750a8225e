use std::sync::Arc;

use tracing::debug;

use super::{BuilderBase, bind_from_provider};
use crate::command::Command;
use crate::descriptor::{ColumnDescriptor, TableDescriptor};
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::value_provider::ValueProvider;

/// `INSERT INTO <table> (<columns>) VALUES (<params>)`, identity columns left out.
#[derive(Debug, Clone)]
pub struct InsertCommandBuilder {
    base: BuilderBase,
    columns: Vec<ColumnDescriptor>,
    template: Option<Command>,
}

impl InsertCommandBuilder {
    #[must_use]
    pub fn new(format: Arc<dyn CommandFormatProvider>, descriptor: Arc<TableDescriptor>) -> Self {
        let columns = descriptor
            .all_columns()
            .iter()
            .filter(|c| !c.is_identity)
            .cloned()
            .collect();
        Self {
            base: BuilderBase::new(format, descriptor),
            columns,
            template: None,
        }
    }

    fn build_template(&self) -> Result<Command, SqlBatchError> {
        if self.columns.is_empty() {
            return Err(SqlBatchError::ArgumentError(format!(
                "table {} has no insertable columns",
                self.base.descriptor.table_name()
            )));
        }
        debug!(table = self.base.descriptor.table_name(), "building insert template");
        let tokens: Vec<String> = self
            .columns
            .iter()
            .map(|c| self.base.parameter_token(c))
            .collect();
        let mut command = Command::new(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.base.table_name(),
            self.base.column_list(&self.columns),
            tokens.join(",")
        ));
        self.base.populate_parameters(&mut command, &self.columns);
        Ok(command)
    }

    /// Bind the provider's current row and return the command.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` if every column is an identity column, the provider
    /// has no current row, or the row lacks a column.
    pub fn get_command(&mut self, provider: &dyn ValueProvider) -> Result<&Command, SqlBatchError> {
        let command = match self.template.take() {
            Some(command) => command,
            None => self.build_template()?,
        };
        let command = self.template.insert(command);
        bind_from_provider(command, &self.columns, provider)?;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::dialect::MssqlFormat;
    use crate::types::{DbType, RowValues};
    use crate::value_provider::EntityValueProvider;

    fn batch_table() -> Arc<TableDescriptor> {
        TableDescriptor::builder("batch")
            .column(ColumnDescriptor::new("id", DbType::Int32).primary_key())
            .column(ColumnDescriptor::new("name", DbType::String))
            .column(ColumnDescriptor::new("mobile", DbType::String))
            .build()
            .unwrap()
    }

    fn row(id: i64, name: &str) -> HashMap<String, RowValues> {
        HashMap::from([
            ("id".to_string(), RowValues::Int(id)),
            ("name".to_string(), RowValues::Text(name.into())),
            ("mobile".to_string(), RowValues::Null),
        ])
    }

    #[test]
    fn binds_each_current_row() {
        let mut builder = InsertCommandBuilder::new(Arc::new(MssqlFormat), batch_table());
        let mut provider = EntityValueProvider::new(vec![row(1, "John"), row(2, "Jane")]);

        provider.move_next();
        let command = builder.get_command(&provider).unwrap();
        assert_eq!(
            command.text(),
            "INSERT INTO [batch] ([id],[name],[mobile]) VALUES (@id,@name,@mobile)"
        );
        assert_eq!(command.values()[1], RowValues::Text("John".into()));

        provider.move_next();
        let command = builder.get_command(&provider).unwrap();
        assert_eq!(command.values()[0], RowValues::Int(2));
    }

    #[test]
    fn identity_columns_are_skipped() {
        let table = TableDescriptor::builder("SimpleTable")
            .column(ColumnDescriptor::new("Id", DbType::Int32).primary_key().identity())
            .column(ColumnDescriptor::new("Name", DbType::String))
            .build()
            .unwrap();
        let mut builder = InsertCommandBuilder::new(Arc::new(MssqlFormat), table);
        let mut provider = EntityValueProvider::new(vec![HashMap::from([(
            "Name".to_string(),
            RowValues::Text("x".into()),
        )])]);
        provider.move_next();
        let command = builder.get_command(&provider).unwrap();
        assert_eq!(command.text(), "INSERT INTO [SimpleTable] ([Name]) VALUES (@Name)");
    }

    #[test]
    fn provider_without_current_row_is_rejected() {
        let mut builder = InsertCommandBuilder::new(Arc::new(MssqlFormat), batch_table());
        let provider = EntityValueProvider::new(vec![row(1, "John")]);
        assert!(matches!(
            builder.get_command(&provider),
            Err(SqlBatchError::ArgumentError(_))
        ));
    }
}
