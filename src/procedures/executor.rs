use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use super::mapper::DatabaseReaderMapper;
use super::registry::MapperRegistry;
use crate::command::{Command, CommandKind, CommandParameter};
use crate::connector::{DatabaseConnector, DatabaseReader};
use crate::descriptor::ColumnDescriptor;
use crate::error::SqlBatchError;
use crate::types::RowValues;
use crate::value_provider::RowSource;

/// Input of a procedure: which parameters it declares and the value of each.
pub trait ProcedureParameters: RowSource {
    /// Declared parameters, in call order.
    fn parameter_columns() -> Vec<ColumnDescriptor>;
}

impl RowSource for () {
    fn value(&self, _column_name: &str) -> Option<RowValues> {
        None
    }
}

impl ProcedureParameters for () {
    fn parameter_columns() -> Vec<ColumnDescriptor> {
        Vec::new()
    }
}

/// A tuple of result element types, one per result set.
///
/// Implemented for tuples of 1 to 8 `'static` types.
pub trait ResultTuple: Sized {
    /// One boxed mapper per position.
    type Mappers;
    /// Optional caller-supplied mapper per position.
    type Explicit: Default;
    /// One `Vec` per position.
    type Output;
    const ARITY: usize;

    /// Pick the explicit mapper for each position, falling back to the registry.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` naming the first position nothing resolves.
    fn resolve(
        explicit: Self::Explicit,
        registry: &MapperRegistry,
    ) -> Result<Self::Mappers, SqlBatchError>;

    /// Map every position in order, advancing between positions but never after the last.
    ///
    /// # Errors
    /// Returns `SqlBatchError::MissingResultSet` when the reader runs out of result sets, and
    /// passes mapper and reader errors through.
    fn read_all(
        mappers: &Self::Mappers,
        reader: &mut dyn DatabaseReader,
    ) -> Result<Self::Output, SqlBatchError>;
}

fn unresolved<T>(position: usize) -> SqlBatchError {
    SqlBatchError::ConfigError(format!(
        "no mapper for result set {position} ({})",
        type_name::<T>()
    ))
}

fn read_position<T>(
    mapper: &dyn DatabaseReaderMapper<T>,
    reader: &mut dyn DatabaseReader,
    position: usize,
    expected: usize,
) -> Result<Vec<T>, SqlBatchError> {
    let positioned = if position == 1 {
        reader.has_result_set()
    } else {
        reader.next_result()?
    };
    if !positioned {
        return Err(SqlBatchError::MissingResultSet { position, expected });
    }
    trace!(position, expected, "mapping result set");
    mapper.map(reader)
}

macro_rules! result_tuple {
    ($arity:literal; $($T:ident . $idx:tt),+) => {
        impl<$($T: 'static),+> ResultTuple for ($($T,)+) {
            type Mappers = ($(Box<dyn DatabaseReaderMapper<$T>>,)+);
            type Explicit = ($(Option<Box<dyn DatabaseReaderMapper<$T>>>,)+);
            type Output = ($(Vec<$T>,)+);
            const ARITY: usize = $arity;

            fn resolve(
                explicit: Self::Explicit,
                registry: &MapperRegistry,
            ) -> Result<Self::Mappers, SqlBatchError> {
                Ok(($(
                    match explicit.$idx {
                        Some(mapper) => mapper,
                        None => registry
                            .resolve::<$T>()
                            .ok_or_else(|| unresolved::<$T>($idx + 1))?,
                    },
                )+))
            }

            fn read_all(
                mappers: &Self::Mappers,
                reader: &mut dyn DatabaseReader,
            ) -> Result<Self::Output, SqlBatchError> {
                Ok(($(
                    read_position(mappers.$idx.as_ref(), reader, $idx + 1, $arity)?,
                )+))
            }
        }
    };
}

result_tuple!(1; T1.0);
result_tuple!(2; T1.0, T2.1);
result_tuple!(3; T1.0, T2.1, T3.2);
result_tuple!(4; T1.0, T2.1, T3.2, T4.3);
result_tuple!(5; T1.0, T2.1, T3.2, T4.3, T5.4);
result_tuple!(6; T1.0, T2.1, T3.2, T4.3, T5.4, T6.5);
result_tuple!(7; T1.0, T2.1, T3.2, T4.3, T5.4, T6.5, T7.6);
result_tuple!(8; T1.0, T2.1, T3.2, T4.3, T5.4, T6.5, T7.6, T8.7);

/// A routine call returning one result set per element of `R`.
///
/// ```rust
/// use sql_batcher::prelude::*;
///
/// #[derive(Debug)]
/// struct Name(String);
///
/// impl FromRow for Name {
///     fn from_row(row: &CustomDbRow) -> Result<Self, SqlBatchError> {
///         let name = row.get("name").and_then(RowValues::as_text).unwrap_or_default();
///         Ok(Name(name.to_string()))
///     }
/// }
///
/// let connector = SqliteConnector::open_in_memory().unwrap();
/// let mut registry = MapperRegistry::new();
/// registry.register_from_row::<Name>();
///
/// let mut procedure = ReaderProcedure::<_, (), (Name, Name)>::from_sql(
///     &connector,
///     "SELECT 'ann' AS name; SELECT 'bob' AS name UNION ALL SELECT 'cy';",
///     &registry,
/// )
/// .unwrap();
/// let (first, second) = procedure.execute(&()).unwrap();
/// assert_eq!(first.len(), 1);
/// assert_eq!(second.len(), 2);
/// ```
pub struct ReaderProcedure<'c, C, P, R>
where
    C: DatabaseConnector + ?Sized,
    R: ResultTuple,
{
    connector: &'c C,
    command: Command,
    columns: Vec<ColumnDescriptor>,
    mappers: R::Mappers,
    _parameters: PhantomData<fn(&P)>,
}

impl<'c, C, P, R> ReaderProcedure<'c, C, P, R>
where
    C: DatabaseConnector + ?Sized,
    P: ProcedureParameters,
    R: ResultTuple,
{
    /// Call the stored routine `procedure_name` in the connector's dialect, with every mapper
    /// taken from `registry`.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` when a position has no mapper.
    pub fn new(
        connector: &'c C,
        procedure_name: &str,
        registry: &MapperRegistry,
    ) -> Result<Self, SqlBatchError> {
        Self::new_with_mappers(connector, procedure_name, Default::default(), registry)
    }

    /// Like [`ReaderProcedure::new`], preferring the given mappers over the registry.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` when a position has no mapper.
    pub fn new_with_mappers(
        connector: &'c C,
        procedure_name: &str,
        explicit: R::Explicit,
        registry: &MapperRegistry,
    ) -> Result<Self, SqlBatchError> {
        let format = connector.format_provider();
        let columns = P::parameter_columns();
        let tokens: Vec<String> = columns
            .iter()
            .map(|c| format.parameter_name(&c.parameter_identifier()))
            .collect();
        let command = connector
            .create_command(&format.procedure_call(procedure_name, &tokens))
            .with_kind(CommandKind::StoredProcedure);
        Self::assemble(connector, command, columns, tokens, explicit, registry)
    }

    /// Run caller-written text that yields the result sets, for engines without stored
    /// routines. Parameters are referenced by their dialect tokens (`@name`, `:name`).
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` when a position has no mapper.
    pub fn from_sql(
        connector: &'c C,
        sql: &str,
        registry: &MapperRegistry,
    ) -> Result<Self, SqlBatchError> {
        Self::from_sql_with_mappers(connector, sql, Default::default(), registry)
    }

    /// Like [`ReaderProcedure::from_sql`], preferring the given mappers over the registry.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ConfigError` when a position has no mapper.
    pub fn from_sql_with_mappers(
        connector: &'c C,
        sql: &str,
        explicit: R::Explicit,
        registry: &MapperRegistry,
    ) -> Result<Self, SqlBatchError> {
        let format = connector.format_provider();
        let columns = P::parameter_columns();
        let tokens = columns
            .iter()
            .map(|c| format.parameter_name(&c.parameter_identifier()))
            .collect();
        let command = connector.create_command(sql);
        Self::assemble(connector, command, columns, tokens, explicit, registry)
    }

    fn assemble(
        connector: &'c C,
        mut command: Command,
        columns: Vec<ColumnDescriptor>,
        tokens: Vec<String>,
        explicit: R::Explicit,
        registry: &MapperRegistry,
    ) -> Result<Self, SqlBatchError> {
        let mappers = R::resolve(explicit, registry)?;
        for (column, token) in columns.iter().zip(tokens) {
            command.add_parameter(CommandParameter::for_column(token, column));
        }
        debug!(arity = R::ARITY, text = command.text(), "prepared reader procedure");
        Ok(Self {
            connector,
            command,
            columns,
            mappers,
            _parameters: PhantomData,
        })
    }

    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Bind `parameters`, run the routine once, and map every result set.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` when a declared parameter has no value and
    /// `SqlBatchError::MissingResultSet` when the routine yields fewer result sets than `R`
    /// has positions. Transport and mapper errors pass through unchanged.
    pub fn execute(&mut self, parameters: &P) -> Result<R::Output, SqlBatchError> {
        let values = self
            .columns
            .iter()
            .map(|c| {
                parameters.value(&c.column_name).ok_or_else(|| {
                    SqlBatchError::ArgumentError(format!(
                        "no value for procedure parameter {}",
                        c.column_name
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (index, value) in values.into_iter().enumerate() {
            if let Some(parameter) = self.command.parameter_at_mut(index) {
                parameter.value = value;
            }
        }

        let mut reader = self.connector.execute_reader(&self.command)?;
        R::read_all(&self.mappers, &mut *reader)
    }
}

impl<C, P, R> fmt::Debug for ReaderProcedure<'_, C, P, R>
where
    C: DatabaseConnector + ?Sized,
    R: ResultTuple,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderProcedure")
            .field("command", &self.command)
            .field("arity", &R::ARITY)
            .finish_non_exhaustive()
    }
}
