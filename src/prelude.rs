//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and traits
//! to make it easier to get started with the library.

pub use crate::batching::{Admission, BatchManager, CommandBatch, CommandBatchStep, RejectReason};
pub use crate::command::{Command, CommandKind, CommandParameter};
pub use crate::command_builders::{
    CommandBuilderFactory, DeleteCommandBuilder, InsertCommandBuilder, LastInsertIdCommandBuilder,
    SelectCommandBuilder, SelectOneCommandBuilder, UpdateCommandBuilder,
};
pub use crate::config::{BatchLimits, BatchLimitsBuilder};
pub use crate::connector::{DatabaseConnector, DatabaseReader};
pub use crate::descriptor::{ColumnDescriptor, TableDescriptor, TableDescriptorBuilder};
pub use crate::dialect::CommandFormatProvider;
pub use crate::error::SqlBatchError;
pub use crate::procedures::{
    DatabaseReaderMapper, FromRow, FromRowMapper, MapperRegistry, ProcedureParameters,
    ReaderProcedure, RowMapper,
};
pub use crate::results::{BufferedReader, Columns, CustomDbRow, ResultSet};
pub use crate::translation::{PlaceholderStyle, bind_positional};
pub use crate::types::{DatabaseType, DbType, RowValues};
pub use crate::value_provider::{EntityValueProvider, RowSource, ValueProvider};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnector, SqliteOptions, SqliteOptionsBuilder};
