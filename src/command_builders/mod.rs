//! Statement templates generated from table metadata.
//!
//! Each builder is created once per (descriptor, dialect) pair, builds its template on first
//! use, and rebinds parameter values on every call. Template text is deterministic:
//! ```rust
//! use sql_batcher::prelude::*;
//!
//! let table = TableDescriptor::builder("SimpleTable")
//!     .column(ColumnDescriptor::new("Id", DbType::Int32).primary_key().identity())
//!     .column(ColumnDescriptor::new("Name", DbType::String))
//!     .build()
//!     .unwrap();
//! let factory = CommandBuilderFactory::new(DatabaseType::Postgres.format_provider());
//! let mut select_one = factory.select_one(table);
//! let command = select_one.get_command(&[RowValues::Int(42)]).unwrap();
//! assert_eq!(
//!     command.text(),
//!     r#"SELECT "Id","Name" FROM "SimpleTable" WHERE "Id"=@Id"#
//! );
//! ```

use std::sync::Arc;

use crate::command::{Command, CommandParameter};
use crate::descriptor::{ColumnDescriptor, TableDescriptor};
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::value_provider::ValueProvider;

mod delete;
mod insert;
mod last_insert_id;
mod select;
mod select_one;
mod update;

pub use delete::DeleteCommandBuilder;
pub use insert::InsertCommandBuilder;
pub use last_insert_id::LastInsertIdCommandBuilder;
pub use select::SelectCommandBuilder;
pub use select_one::SelectOneCommandBuilder;
pub use update::UpdateCommandBuilder;

/// Creates every builder kind for one dialect.
#[derive(Debug, Clone)]
pub struct CommandBuilderFactory {
    format: Arc<dyn CommandFormatProvider>,
}

impl CommandBuilderFactory {
    #[must_use]
    pub fn new(format: Arc<dyn CommandFormatProvider>) -> Self {
        Self { format }
    }

    #[must_use]
    pub fn select(&self, descriptor: Arc<TableDescriptor>) -> SelectCommandBuilder {
        SelectCommandBuilder::new(self.format.clone(), descriptor)
    }

    #[must_use]
    pub fn select_one(&self, descriptor: Arc<TableDescriptor>) -> SelectOneCommandBuilder {
        SelectOneCommandBuilder::new(self.format.clone(), descriptor)
    }

    #[must_use]
    pub fn insert(&self, descriptor: Arc<TableDescriptor>) -> InsertCommandBuilder {
        InsertCommandBuilder::new(self.format.clone(), descriptor)
    }

    #[must_use]
    pub fn update(&self, descriptor: Arc<TableDescriptor>) -> UpdateCommandBuilder {
        UpdateCommandBuilder::new(self.format.clone(), descriptor)
    }

    #[must_use]
    pub fn delete(&self, descriptor: Arc<TableDescriptor>) -> DeleteCommandBuilder {
        DeleteCommandBuilder::new(self.format.clone(), descriptor)
    }

    #[must_use]
    pub fn last_insert_id(&self) -> LastInsertIdCommandBuilder {
        LastInsertIdCommandBuilder::new(self.format.clone())
    }
}

/// State shared by every table-bound builder.
#[derive(Debug, Clone)]
pub(crate) struct BuilderBase {
    pub(crate) format: Arc<dyn CommandFormatProvider>,
    pub(crate) descriptor: Arc<TableDescriptor>,
}

impl BuilderBase {
    pub(crate) fn new(format: Arc<dyn CommandFormatProvider>, descriptor: Arc<TableDescriptor>) -> Self {
        Self { format, descriptor }
    }

    /// `catalog.schema.table`, each part escaped.
    pub(crate) fn table_name(&self) -> String {
        let d = &self.descriptor;
        [d.catalog_name(), d.schema_name(), Some(d.table_name())]
            .into_iter()
            .flatten()
            .map(|part| self.format.escape_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub(crate) fn column_list<'a, I>(&self, columns: I) -> String
    where
        I: IntoIterator<Item = &'a ColumnDescriptor>,
    {
        columns
            .into_iter()
            .map(|c| self.format.escape_identifier(&c.column_name))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn parameter_token(&self, column: &ColumnDescriptor) -> String {
        self.format.parameter_name(&column.parameter_identifier())
    }

    /// `"a"=@a AND "b"=@b` over the primary key, in key order.
    pub(crate) fn key_predicate(&self) -> String {
        self.descriptor
            .primary_key_columns()
            .iter()
            .map(|c| {
                format!(
                    "{}={}",
                    self.format.escape_identifier(&c.column_name),
                    self.parameter_token(c)
                )
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    pub(crate) fn require_primary_key(&self, operation: &str) -> Result<(), SqlBatchError> {
        if self.descriptor.primary_key_columns().is_empty() {
            return Err(SqlBatchError::ArgumentError(format!(
                "{operation} needs a primary key, but table {} has none",
                self.descriptor.table_name()
            )));
        }
        Ok(())
    }

    /// Append one unbound parameter per column, in column order.
    pub(crate) fn populate_parameters<'a, I>(&self, command: &mut Command, columns: I)
    where
        I: IntoIterator<Item = &'a ColumnDescriptor>,
    {
        for column in columns {
            command.add_parameter(CommandParameter::for_column(
                self.parameter_token(column),
                column,
            ));
        }
    }
}

/// Rebind a template's parameters from the provider's current row.
///
/// `columns` lists the column behind each parameter, in declaration order. All values are read
/// before any is written, so a failed read leaves the previous binding intact.
pub(crate) fn bind_from_provider(
    command: &mut Command,
    columns: &[ColumnDescriptor],
    provider: &dyn ValueProvider,
) -> Result<(), SqlBatchError> {
    if !provider.has_current() {
        return Err(SqlBatchError::ArgumentError(
            "the value provider has no current row".to_string(),
        ));
    }
    let values = columns
        .iter()
        .map(|c| provider.get_value(&c.column_name))
        .collect::<Result<Vec<_>, _>>()?;
    for (index, value) in values.into_iter().enumerate() {
        if let Some(parameter) = command.parameter_at_mut(index) {
            parameter.value = value;
        }
    }
    Ok(())
}
