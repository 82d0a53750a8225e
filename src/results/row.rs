use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// Column header of one result set, shared by every row in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Columns {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        // first occurrence wins for duplicated names (`SELECT a, a`)
        let mut positions = HashMap::with_capacity(names.len());
        for (ordinal, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(ordinal);
        }
        Self { names, positions }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One buffered row: values by ordinal plus the shared column header.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomDbRow {
    columns: Arc<Columns>,
    values: Vec<RowValues>,
}

impl CustomDbRow {
    #[must_use]
    pub fn new(columns: Arc<Columns>, values: Vec<RowValues>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn columns(&self) -> &Arc<Columns> {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    /// Value of `column_name`, if the row has that column.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.columns
            .position(column_name)
            .and_then(|ordinal| self.values.get(ordinal))
    }

    #[must_use]
    pub fn get_by_index(&self, ordinal: usize) -> Option<&RowValues> {
        self.values.get(ordinal)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
