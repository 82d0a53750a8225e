use std::sync::Arc;

use super::row::{Columns, CustomDbRow};
use crate::types::RowValues;

/// Every row one statement returned, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Arc<Columns>,
    rows: Vec<CustomDbRow>,
}

impl ResultSet {
    #[must_use]
    pub fn new(column_names: Vec<String>) -> Self {
        Self {
            columns: Arc::new(Columns::new(column_names)),
            rows: Vec::new(),
        }
    }

    /// Build a set from a header and literal rows; handy for scripted readers.
    #[must_use]
    pub fn from_rows<S: Into<String>>(columns: Vec<S>, rows: Vec<Vec<RowValues>>) -> Self {
        let mut set = Self::new(columns.into_iter().map(Into::into).collect());
        set.rows.reserve(rows.len());
        for values in rows {
            set.push_row(values);
        }
        set
    }

    /// Append a row under this set's header.
    pub fn push_row(&mut self, values: Vec<RowValues>) {
        self.rows
            .push(CustomDbRow::new(Arc::clone(&self.columns), values));
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
    pub fn rows(&self) -> &[CustomDbRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
