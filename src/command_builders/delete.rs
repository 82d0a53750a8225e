use std::sync::Arc;

use super::BuilderBase;
use crate::command::Command;
use crate::descriptor::TableDescriptor;
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::types::RowValues;
use crate::value_provider::RowSource;

/// `DELETE FROM <table> WHERE <key> IN (<literal>,...)`.
///
/// The number of entities is only known per call, so keys are written as inline literals
/// instead of parameters. Keys are expected to be opaque or numeric values; text keys are
/// quoted, but this path must not be fed attacker-controlled strings.
#[derive(Debug, Clone)]
pub struct DeleteCommandBuilder {
    base: BuilderBase,
    prefix: Option<String>,
}

impl DeleteCommandBuilder {
    #[must_use]
    pub fn new(format: Arc<dyn CommandFormatProvider>, descriptor: Arc<TableDescriptor>) -> Self {
        Self {
            base: BuilderBase::new(format, descriptor),
            prefix: None,
        }
    }

    fn prefix(&mut self) -> &str {
        let prefix = match self.prefix.take() {
            Some(prefix) => prefix,
            None => format!("DELETE FROM {} WHERE ", self.base.table_name()),
        };
        self.prefix.insert(prefix)
    }

    /// Delete every entity in `entities`, reading key values by column name.
    ///
    /// Single-column keys render `<key> IN (...)`; composite keys render
    /// `(<a>=.. AND <b>=..) OR (...)`.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` if the table has no primary key, `entities` is
    /// empty, an entity lacks a key column, or a key has no literal form.
    pub fn get_command<T: RowSource>(&mut self, entities: &[T]) -> Result<Command, SqlBatchError> {
        self.base.require_primary_key("delete")?;
        let keys = self.base.descriptor.primary_key_columns().to_vec();
        let rows = entities
            .iter()
            .map(|entity| {
                keys.iter()
                    .map(|key| {
                        entity.value(&key.column_name).ok_or_else(|| {
                            SqlBatchError::ArgumentError(format!(
                                "entity has no value for key column {}",
                                key.column_name
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.build(&rows)
    }

    /// Delete rows by single-column key values.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` if the key is not a single column, `ids` is empty,
    /// or an id has no literal form.
    pub fn get_command_for_keys(&mut self, ids: &[RowValues]) -> Result<Command, SqlBatchError> {
        self.base.require_primary_key("delete")?;
        if self.base.descriptor.primary_key_columns().len() != 1 {
            return Err(SqlBatchError::ArgumentError(
                "deleting by bare ids needs a single-column primary key".to_string(),
            ));
        }
        let rows: Vec<Vec<RowValues>> = ids.iter().map(|id| vec![id.clone()]).collect();
        self.build(&rows)
    }

    fn build(&mut self, rows: &[Vec<RowValues>]) -> Result<Command, SqlBatchError> {
        if rows.is_empty() {
            return Err(SqlBatchError::ArgumentError(
                "at least one entity is needed to build a delete".to_string(),
            ));
        }
        let format = self.base.format.clone();
        let keys: Vec<String> = self
            .base
            .descriptor
            .primary_key_columns()
            .iter()
            .map(|c| format.escape_identifier(&c.column_name))
            .collect();

        let predicate = if let [key] = keys.as_slice() {
            let literals = rows
                .iter()
                .map(|row| format.format_literal(&row[0]))
                .collect::<Result<Vec<_>, _>>()?;
            format!("{key} IN ({})", literals.join(","))
        } else {
            let groups = rows
                .iter()
                .map(|row| {
                    keys.iter()
                        .zip(row)
                        .map(|(key, value)| -> Result<String, SqlBatchError> {
                            Ok(format!("{key}={}", format.format_literal(value)?))
                        })
                        .collect::<Result<Vec<_>, _>>()
                        .map(|parts| format!("({})", parts.join(" AND ")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            groups.join(" OR ")
        };

        Ok(Command::new(format!("{}{predicate}", self.prefix())))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::descriptor::ColumnDescriptor;
    use crate::dialect::{PostgresFormat, SqliteFormat};
    use crate::types::DbType;

    fn entity(id: i64) -> HashMap<String, RowValues> {
        HashMap::from([("Id".to_string(), RowValues::Int(id))])
    }

    fn simple_table() -> Arc<TableDescriptor> {
        TableDescriptor::builder("SimpleTable")
            .column(ColumnDescriptor::new("Id", DbType::Int32).primary_key())
            .column(ColumnDescriptor::new("Name", DbType::String))
            .build()
            .unwrap()
    }

    #[test]
    fn deletes_by_literal_id_list() {
        let mut builder = DeleteCommandBuilder::new(Arc::new(PostgresFormat), simple_table());
        let one = builder.get_command(&[entity(723)]).unwrap();
        assert_eq!(one.text(), r#"DELETE FROM "SimpleTable" WHERE "Id" IN (723)"#);
        assert!(one.parameters().is_empty());

        let two = builder.get_command(&[entity(723), entity(15)]).unwrap();
        assert_eq!(two.text(), r#"DELETE FROM "SimpleTable" WHERE "Id" IN (723,15)"#);
    }

    #[test]
    fn composite_keys_render_grouped_predicates() {
        let table = TableDescriptor::builder("pairs")
            .column(ColumnDescriptor::new("a", DbType::Int32))
            .column(ColumnDescriptor::new("b", DbType::String))
            .primary_keys(["a", "b"])
            .build()
            .unwrap();
        let mut builder = DeleteCommandBuilder::new(Arc::new(SqliteFormat), table);
        let rows = vec![
            HashMap::from([
                ("a".to_string(), RowValues::Int(1)),
                ("b".to_string(), RowValues::Text("x".into())),
            ]),
            HashMap::from([
                ("a".to_string(), RowValues::Int(2)),
                ("b".to_string(), RowValues::Text("y".into())),
            ]),
        ];
        let command = builder.get_command(&rows).unwrap();
        assert_eq!(
            command.text(),
            r#"DELETE FROM "pairs" WHERE ("a"=1 AND "b"='x') OR ("a"=2 AND "b"='y')"#
        );

        assert!(matches!(
            builder.get_command_for_keys(&[RowValues::Int(1)]),
            Err(SqlBatchError::ArgumentError(_))
        ));
    }

    #[test]
    fn empty_entity_lists_are_rejected() {
        let mut builder = DeleteCommandBuilder::new(Arc::new(PostgresFormat), simple_table());
        assert!(matches!(
            builder.get_command_for_keys(&[]),
            Err(SqlBatchError::ArgumentError(_))
        ));
        let rows: Vec<HashMap<String, RowValues>> = Vec::new();
        assert!(builder.get_command(&rows).is_err());
    }
}
