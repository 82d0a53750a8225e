use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlBatchError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns `SqlBatchError::SqliteError` if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<RowValues, SqlBatchError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run an already-bound, row-returning statement and buffer every row.
///
/// # Errors
/// Returns `SqlBatchError::SqliteError` if stepping the statement fails.
pub fn build_result_set(stmt: &mut Statement<'_>) -> Result<ResultSet, SqlBatchError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::new(column_names);

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let row_values = (0..col_count)
            .map(|i| extract_value(row, i))
            .collect::<Result<Vec<_>, _>>()?;
        result_set.push_row(row_values);
    }

    Ok(result_set)
}
