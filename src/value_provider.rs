//! Cursors over source rows, consumed by the mutation builders.

use std::collections::HashMap;

use crate::error::SqlBatchError;
use crate::results::CustomDbRow;
use crate::types::RowValues;

/// Cursor over an ordered sequence of source rows.
///
/// A fresh provider is positioned before the first row; call [`ValueProvider::move_next`]
/// before reading.
pub trait ValueProvider {
    /// Whether the cursor currently points at a row.
    fn has_current(&self) -> bool;

    /// Advance to the next row; returns `false` once past the end.
    fn move_next(&mut self) -> bool;

    /// Value of `column_name` on the current row.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` when no row is current or the row lacks the
    /// column.
    fn get_value(&self, column_name: &str) -> Result<RowValues, SqlBatchError>;
}

/// Anything that can hand out a value per column name.
pub trait RowSource {
    fn value(&self, column_name: &str) -> Option<RowValues>;
}

impl RowSource for CustomDbRow {
    fn value(&self, column_name: &str) -> Option<RowValues> {
        self.get(column_name).cloned()
    }
}

impl RowSource for HashMap<String, RowValues> {
    fn value(&self, column_name: &str) -> Option<RowValues> {
        self.get(column_name).cloned()
    }
}

/// [`ValueProvider`] over an owned list of rows.
#[derive(Debug, Clone)]
pub struct EntityValueProvider<T> {
    rows: Vec<T>,
    position: Option<usize>,
}

impl<T: RowSource> EntityValueProvider<T> {
    #[must_use]
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            position: None,
        }
    }

    /// The row under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.position.and_then(|idx| self.rows.get(idx))
    }
}

impl<T: RowSource> ValueProvider for EntityValueProvider<T> {
    fn has_current(&self) -> bool {
        self.current().is_some()
    }

    fn move_next(&mut self) -> bool {
        let next = self.position.map_or(0, |idx| idx + 1);
        self.position = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    fn get_value(&self, column_name: &str) -> Result<RowValues, SqlBatchError> {
        let row = self.current().ok_or_else(|| {
            SqlBatchError::ArgumentError("the value provider has no current row".to_string())
        })?;
        row.value(column_name).ok_or_else(|| {
            SqlBatchError::ArgumentError(format!(
                "the current row has no value for column {column_name}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64) -> HashMap<String, RowValues> {
        HashMap::from([("id".to_string(), RowValues::Int(id))])
    }

    #[test]
    fn cursor_starts_before_first_row() {
        let mut provider = EntityValueProvider::new(vec![row(1), row(2)]);
        assert!(!provider.has_current());
        assert!(provider.get_value("id").is_err());

        assert!(provider.move_next());
        assert_eq!(provider.get_value("id").unwrap(), RowValues::Int(1));
        assert!(provider.move_next());
        assert_eq!(provider.get_value("id").unwrap(), RowValues::Int(2));
        assert!(!provider.move_next());
        assert!(!provider.has_current());
        assert!(!provider.move_next());
    }

    #[test]
    fn missing_columns_are_argument_errors() {
        let mut provider = EntityValueProvider::new(vec![row(1)]);
        provider.move_next();
        assert!(matches!(
            provider.get_value("name"),
            Err(SqlBatchError::ArgumentError(_))
        ));
    }
}
