use rusqlite::Statement;
use rusqlite::types::Value;

use crate::command::Command;
use crate::error::SqlBatchError;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bind every parameter `stmt` declares from the command's parameter of the same token.
///
/// # Errors
/// Returns `SqlBatchError::ConsistencyError` when the statement names a parameter the command
/// does not declare, `SqlBatchError::ArgumentError` for anonymous `?` placeholders, and
/// `SqlBatchError::SqliteError` if binding fails.
pub fn bind_named_parameters(stmt: &mut Statement<'_>, command: &Command) -> Result<(), SqlBatchError> {
    for index in 1..=stmt.parameter_count() {
        let name = stmt.parameter_name(index).map(str::to_owned).ok_or_else(|| {
            SqlBatchError::ArgumentError(format!(
                "placeholder {index} is anonymous; commands must use named parameters"
            ))
        })?;
        let parameter = command.parameter(&name).ok_or_else(|| {
            SqlBatchError::ConsistencyError(format!(
                "parameter {name} not found inside the parameters collection"
            ))
        })?;
        stmt.raw_bind_parameter(index, row_value_to_sqlite_value(&parameter.value))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn converts_every_variant() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(row_value_to_sqlite_value(&RowValues::Bool(true)), Value::Integer(1));
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Timestamp(ts)),
            Value::Text("2024-01-02 03:04:05".into())
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::JSON(serde_json::json!({"a": 1}))),
            Value::Text(r#"{"a":1}"#.into())
        );
        assert_eq!(row_value_to_sqlite_value(&RowValues::Null), Value::Null);
    }
}
