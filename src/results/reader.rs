use super::result_set::ResultSet;
use crate::connector::DatabaseReader;
use crate::error::SqlBatchError;
use crate::types::RowValues;

/// A [`DatabaseReader`] over result sets that were fully fetched up front.
///
/// Connectors whose driver cannot hold a cursor open across calls buffer every result set of a
/// command and hand this reader out.
#[derive(Debug, Clone, Default)]
pub struct BufferedReader {
    sets: Vec<ResultSet>,
    set_index: usize,
    row_index: Option<usize>,
}

impl BufferedReader {
    #[must_use]
    pub fn new(sets: Vec<ResultSet>) -> Self {
        Self {
            sets,
            set_index: 0,
            row_index: None,
        }
    }

    fn current_set(&self) -> Option<&ResultSet> {
        self.sets.get(self.set_index)
    }
}

impl DatabaseReader for BufferedReader {
    fn read(&mut self) -> Result<bool, SqlBatchError> {
        let Some(set) = self.sets.get(self.set_index) else {
            return Ok(false);
        };
        let next = self.row_index.map_or(0, |idx| idx + 1);
        self.row_index = Some(next.min(set.len()));
        Ok(next < set.len())
    }

    fn field_count(&self) -> usize {
        self.column_names().len()
    }

    fn column_names(&self) -> &[String] {
        self.current_set()
            .map(ResultSet::column_names)
            .unwrap_or_default()
    }

    fn get_value(&self, ordinal: usize) -> Result<RowValues, SqlBatchError> {
        let row = self
            .current_set()
            .zip(self.row_index)
            .and_then(|(set, idx)| set.rows().get(idx))
            .ok_or_else(|| {
                SqlBatchError::ExecutionError("the reader is not positioned on a row".to_string())
            })?;
        row.get_by_index(ordinal).cloned().ok_or_else(|| {
            SqlBatchError::ArgumentError(format!(
                "ordinal {ordinal} is out of range for a row of {} fields",
                row.len()
            ))
        })
    }

    fn has_result_set(&self) -> bool {
        self.set_index < self.sets.len()
    }

    fn next_result(&mut self) -> Result<bool, SqlBatchError> {
        if self.set_index < self.sets.len() {
            self.set_index += 1;
        }
        self.row_index = None;
        Ok(self.set_index < self.sets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> BufferedReader {
        BufferedReader::new(vec![
            ResultSet::from_rows(vec!["id"], vec![vec![RowValues::Int(1)], vec![RowValues::Int(2)]]),
            ResultSet::from_rows(vec!["name", "age"], vec![vec![
                RowValues::Text("ann".into()),
                RowValues::Int(40),
            ]]),
        ])
    }

    #[test]
    fn walks_rows_then_result_sets() {
        let mut reader = reader();
        assert!(reader.read().unwrap());
        assert_eq!(reader.get_value(0).unwrap(), RowValues::Int(1));
        assert!(reader.read().unwrap());
        assert_eq!(reader.get_value(0).unwrap(), RowValues::Int(2));
        assert!(!reader.read().unwrap());
        assert!(!reader.read().unwrap());

        assert!(reader.next_result().unwrap());
        assert_eq!(reader.field_count(), 2);
        assert!(reader.read().unwrap());
        assert_eq!(
            reader.get_value_by_name("age").unwrap(),
            RowValues::Int(40)
        );
        assert!(!reader.next_result().unwrap());
        assert!(!reader.has_result_set());
        assert!(!reader.next_result().unwrap());
        assert!(!reader.read().unwrap());
    }

    #[test]
    fn reader_over_no_sets_has_no_result_set() {
        let mut reader = BufferedReader::new(Vec::new());
        assert!(!reader.has_result_set());
        assert!(!reader.read().unwrap());
        assert_eq!(reader.field_count(), 0);
    }

    #[test]
    fn reading_values_needs_a_current_row() {
        let mut reader = reader();
        assert!(matches!(reader.get_value(0), Err(SqlBatchError::ExecutionError(_))));
        reader.read().unwrap();
        assert!(matches!(reader.get_value(5), Err(SqlBatchError::ArgumentError(_))));
    }
}
