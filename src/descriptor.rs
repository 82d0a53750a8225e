//! Immutable table metadata consumed by the command builders.
//!
//! Descriptors are built once per entity shape and shared by reference:
//! ```rust
//! use sql_batcher::prelude::*;
//!
//! let table = TableDescriptor::builder("SimpleTable")
//!     .column(ColumnDescriptor::new("Id", DbType::Int32).primary_key().identity())
//!     .column(ColumnDescriptor::new("Name", DbType::String).max_size(200))
//!     .build()
//!     .unwrap();
//! assert_eq!(table.primary_key_columns().len(), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::SqlBatchError;
use crate::types::DbType;

/// Metadata for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub column_name: String,
    pub data_type: DbType,
    pub max_size: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub is_nullable: bool,
    pub is_identity: bool,
    pub is_primary_key: bool,
}

impl ColumnDescriptor {
    #[must_use]
    pub fn new(column_name: impl Into<String>, data_type: DbType) -> Self {
        Self {
            column_name: column_name.into(),
            data_type,
            max_size: None,
            precision: None,
            scale: None,
            is_nullable: false,
            is_identity: false,
            is_primary_key: false,
        }
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Mark the column as generated by the database (skipped by inserts).
    #[must_use]
    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    #[must_use]
    pub fn max_size(mut self, size: u32) -> Self {
        self.max_size = Some(size);
        self
    }

    #[must_use]
    pub fn numeric(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Identifier used for this column's parameter token.
    ///
    /// Characters outside `[A-Za-z0-9_]` become `_`, and a name that does not start with a letter
    /// gets a `p_` prefix, so the token is always matched whole by the batch scanner.
    #[must_use]
    pub fn parameter_identifier(&self) -> String {
        let mut ident: String = self
            .column_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if !ident.starts_with(|c: char| c.is_ascii_alphabetic()) {
            ident.insert_str(0, "p_");
        }
        ident
    }
}

/// Metadata for one table: qualified name, ordered columns, ordered primary keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    catalog_name: Option<String>,
    schema_name: Option<String>,
    table_name: String,
    columns: Vec<ColumnDescriptor>,
    primary_key_columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    #[must_use]
    pub fn builder(table_name: impl Into<String>) -> TableDescriptorBuilder {
        TableDescriptorBuilder::new(table_name)
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    #[must_use]
    pub fn catalog_name(&self) -> Option<&str> {
        self.catalog_name.as_deref()
    }

    #[must_use]
    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    #[must_use]
    pub fn all_columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Primary-key columns in binding order.
    #[must_use]
    pub fn primary_key_columns(&self) -> &[ColumnDescriptor] {
        &self.primary_key_columns
    }

    #[must_use]
    pub fn column(&self, column_name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.column_name == column_name)
    }
}

/// One-time construction step for a [`TableDescriptor`].
#[derive(Debug, Clone)]
pub struct TableDescriptorBuilder {
    catalog_name: Option<String>,
    schema_name: Option<String>,
    table_name: String,
    columns: Vec<ColumnDescriptor>,
    key_order: Option<Vec<String>>,
}

impl TableDescriptorBuilder {
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            catalog_name: None,
            schema_name: None,
            table_name: table_name.into(),
            columns: Vec::new(),
            key_order: None,
        }
    }

    #[must_use]
    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog_name = Some(catalog.into());
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Fix the primary key and its binding order explicitly.
    #[must_use]
    pub fn primary_keys<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Freeze the descriptor.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` if the table has no columns, a column name repeats,
    /// two columns map to the same parameter identifier, or an explicit primary key names an
    /// unknown column.
    pub fn build(self) -> Result<Arc<TableDescriptor>, SqlBatchError> {
        if self.table_name.is_empty() {
            return Err(SqlBatchError::ArgumentError(
                "a table descriptor needs a table name".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(SqlBatchError::ArgumentError(format!(
                "table {} has no columns",
                self.table_name
            )));
        }

        let mut seen = HashSet::new();
        let mut identifiers: HashMap<String, &str> = HashMap::new();
        for column in &self.columns {
            if !seen.insert(column.column_name.as_str()) {
                return Err(SqlBatchError::ArgumentError(format!(
                    "column {} is declared twice on table {}",
                    column.column_name, self.table_name
                )));
            }
            let ident = column.parameter_identifier();
            if let Some(other) = identifiers.insert(ident.clone(), &column.column_name) {
                return Err(SqlBatchError::ArgumentError(format!(
                    "columns {other} and {} of table {} share the parameter name {ident}",
                    column.column_name, self.table_name
                )));
            }
        }

        let mut columns = self.columns;
        let primary_key_columns = match self.key_order {
            Some(order) => {
                for column in &mut columns {
                    column.is_primary_key = order.contains(&column.column_name);
                }
                order
                    .iter()
                    .map(|name| {
                        columns
                            .iter()
                            .find(|c| &c.column_name == name)
                            .cloned()
                            .ok_or_else(|| {
                                SqlBatchError::ArgumentError(format!(
                                    "primary key column {name} is not a column of {}",
                                    self.table_name
                                ))
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => columns.iter().filter(|c| c.is_primary_key).cloned().collect(),
        };

        Ok(Arc::new(TableDescriptor {
            catalog_name: self.catalog_name,
            schema_name: self.schema_name,
            table_name: self.table_name,
            columns,
            primary_key_columns,
        }))
    }
}
