use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::connector::DatabaseReader;
use crate::error::SqlBatchError;
use crate::results::{Columns, CustomDbRow};

/// Turns the current result set of a reader into typed values.
pub trait DatabaseReaderMapper<T> {
    /// Consume every remaining row of the current result set. Must not advance to the next
    /// result set.
    ///
    /// # Errors
    /// Reader failures and per-row conversion failures.
    fn map(&self, reader: &mut dyn DatabaseReader) -> Result<Vec<T>, SqlBatchError>;
}

/// Types that can be built from one result row.
pub trait FromRow: Sized {
    /// # Errors
    /// Returns an error when a column is missing or holds an unexpected value.
    fn from_row(row: &CustomDbRow) -> Result<Self, SqlBatchError>;
}

/// Copy the reader's current row out as a [`CustomDbRow`] under `columns`.
///
/// # Errors
/// Reader failures, for example when no row is current.
pub fn read_row(
    reader: &dyn DatabaseReader,
    columns: &Arc<Columns>,
) -> Result<CustomDbRow, SqlBatchError> {
    let values = (0..reader.field_count())
        .map(|ordinal| reader.get_value(ordinal))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CustomDbRow::new(Arc::clone(columns), values))
}

fn map_rows<T, F>(reader: &mut dyn DatabaseReader, mut convert: F) -> Result<Vec<T>, SqlBatchError>
where
    F: FnMut(&CustomDbRow) -> Result<T, SqlBatchError>,
{
    let columns = Arc::new(Columns::new(reader.column_names().to_vec()));
    let mut mapped = Vec::new();
    while reader.read()? {
        let row = read_row(reader, &columns)?;
        mapped.push(convert(&row)?);
    }
    Ok(mapped)
}

/// Mapper backed by a closure over each row.
pub struct RowMapper<T, F> {
    convert: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> RowMapper<T, F>
where
    F: Fn(&CustomDbRow) -> Result<T, SqlBatchError>,
{
    pub fn new(convert: F) -> Self {
        Self {
            convert,
            _marker: PhantomData,
        }
    }
}

impl<T, F> DatabaseReaderMapper<T> for RowMapper<T, F>
where
    F: Fn(&CustomDbRow) -> Result<T, SqlBatchError>,
{
    fn map(&self, reader: &mut dyn DatabaseReader) -> Result<Vec<T>, SqlBatchError> {
        map_rows(reader, &self.convert)
    }
}

impl<T, F> fmt::Debug for RowMapper<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowMapper").finish_non_exhaustive()
    }
}

/// Mapper for any [`FromRow`] type.
pub struct FromRowMapper<T>(PhantomData<fn() -> T>);

impl<T> FromRowMapper<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FromRowMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FromRowMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromRowMapper")
    }
}

impl<T: FromRow> DatabaseReaderMapper<T> for FromRowMapper<T> {
    fn map(&self, reader: &mut dyn DatabaseReader) -> Result<Vec<T>, SqlBatchError> {
        map_rows(reader, T::from_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{BufferedReader, ResultSet};
    use crate::types::RowValues;

    #[derive(Debug, PartialEq)]
    struct Client {
        id: i64,
        name: String,
    }

    impl FromRow for Client {
        fn from_row(row: &CustomDbRow) -> Result<Self, SqlBatchError> {
            let id = row.get("id").and_then(RowValues::as_int);
            let name = row.get("name").and_then(RowValues::as_text);
            match (id, name) {
                (Some(id), Some(name)) => Ok(Client {
                    id,
                    name: name.to_string(),
                }),
                _ => Err(SqlBatchError::ExecutionError("malformed client row".into())),
            }
        }
    }

    fn clients() -> BufferedReader {
        BufferedReader::new(vec![
            ResultSet::from_rows(
                vec!["id", "name"],
                vec![
                    vec![RowValues::Int(1), RowValues::Text("ann".into())],
                    vec![RowValues::Int(2), RowValues::Text("bob".into())],
                ],
            ),
            ResultSet::from_rows(vec!["total"], vec![vec![RowValues::Int(2)]]),
        ])
    }

    #[test]
    fn from_row_mapper_stays_on_the_current_set() {
        let mut reader = clients();
        let mapped = FromRowMapper::<Client>::new().map(&mut reader).unwrap();
        assert_eq!(
            mapped,
            vec![
                Client { id: 1, name: "ann".into() },
                Client { id: 2, name: "bob".into() },
            ]
        );
        assert!(reader.next_result().unwrap());
        assert_eq!(reader.column_names(), ["total".to_string()]);
    }

    #[test]
    fn row_mapper_propagates_conversion_errors() {
        let mut reader = clients();
        let mapper = RowMapper::new(|row: &CustomDbRow| {
            row.get("missing")
                .cloned()
                .ok_or_else(|| SqlBatchError::ArgumentError("missing".into()))
        });
        assert!(matches!(
            mapper.map(&mut reader),
            Err(SqlBatchError::ArgumentError(_))
        ));
    }
}
