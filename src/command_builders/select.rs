use std::sync::Arc;

use tracing::debug;

use super::BuilderBase;
use crate::command::{Command, CommandParameter};
use crate::descriptor::TableDescriptor;
use crate::dialect::CommandFormatProvider;

/// `SELECT <all columns> FROM <table>`.
#[derive(Debug, Clone)]
pub struct SelectCommandBuilder {
    base: BuilderBase,
    template: Option<Command>,
}

impl SelectCommandBuilder {
    #[must_use]
    pub fn new(format: Arc<dyn CommandFormatProvider>, descriptor: Arc<TableDescriptor>) -> Self {
        Self {
            base: BuilderBase::new(format, descriptor),
            template: None,
        }
    }

    fn template_text(&self) -> String {
        format!(
            "SELECT {} FROM {}",
            self.base.column_list(self.base.descriptor.all_columns()),
            self.base.table_name()
        )
    }

    /// The parameterless select-all command.
    pub fn get_command(&mut self) -> &Command {
        let command = match self.template.take() {
            Some(command) => command,
            None => {
                debug!(table = self.base.descriptor.table_name(), "building select template");
                Command::new(self.template_text())
            }
        };
        self.template.insert(command)
    }

    /// A fresh select with ` WHERE <clause>` appended and the caller's parameters attached.
    ///
    /// The clause is inserted verbatim; tokens inside it must match `parameters` by name.
    #[must_use]
    pub fn get_command_where(&self, clause: &str, parameters: Vec<CommandParameter>) -> Command {
        let mut command = Command::new(format!("{} WHERE {clause}", self.template_text()));
        for parameter in parameters {
            command.add_parameter(parameter);
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ColumnDescriptor;
    use crate::dialect::{MssqlFormat, PostgresFormat};
    use crate::types::{DbType, RowValues};

    fn table() -> Arc<TableDescriptor> {
        TableDescriptor::builder("SimpleTable")
            .schema("dbo")
            .column(ColumnDescriptor::new("Id", DbType::Int32).primary_key())
            .column(ColumnDescriptor::new("Name", DbType::String))
            .build()
            .unwrap()
    }

    #[test]
    fn select_lists_every_column_of_the_qualified_table() {
        let mut builder = SelectCommandBuilder::new(Arc::new(MssqlFormat), table());
        let command = builder.get_command();
        assert_eq!(command.text(), "SELECT [Id],[Name] FROM [dbo].[SimpleTable]");
        assert!(command.parameters().is_empty());
    }

    #[test]
    fn where_clause_gets_its_own_command() {
        let mut builder = SelectCommandBuilder::new(Arc::new(PostgresFormat), table());
        let filtered = builder.get_command_where(
            "\"Name\"=@name",
            vec![CommandParameter::new("@name", RowValues::Text("John Doe".into()))],
        );
        assert_eq!(
            filtered.text(),
            r#"SELECT "Id","Name" FROM "dbo"."SimpleTable" WHERE "Name"=@name"#
        );
        assert_eq!(filtered.parameters().len(), 1);
        assert!(!builder.get_command().text().contains("WHERE"));
    }
}
