//! Multi-dialect SQL command synthesis and batching.
//!
//! Builders turn [`TableDescriptor`] metadata into parameterized statements for PostgreSQL,
//! `SQLite`, SQL Server, `MySQL` and Cassandra. A [`CommandBatch`] merges independent commands
//! into one round trip, renaming parameters so they cannot collide, and routes each result set
//! back to the step that asked for it. [`ReaderProcedure`] maps the result sets of one routine
//! call into a tuple of typed collections.
//!
//! The engine is synchronous and reaches the database only through the
//! [`DatabaseConnector`] and [`DatabaseReader`] traits; a bundled `rusqlite` connector ships
//! behind the default `sqlite` feature.

pub mod batching;
pub mod command;
pub mod command_builders;
pub mod config;
pub mod connector;
pub mod descriptor;
pub mod dialect;
pub mod error;
pub mod prelude;
pub mod procedures;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod translation;
pub mod types;
pub mod value_provider;

pub use batching::{Admission, BatchManager, CommandBatch, CommandBatchStep, RejectReason};
pub use command::{Command, CommandKind, CommandParameter};
pub use command_builders::CommandBuilderFactory;
pub use config::{BatchLimits, BatchLimitsBuilder};
pub use connector::{DatabaseConnector, DatabaseReader};
pub use descriptor::{ColumnDescriptor, TableDescriptor};
pub use dialect::CommandFormatProvider;
pub use error::SqlBatchError;
pub use procedures::{MapperRegistry, ReaderProcedure};
pub use types::{DatabaseType, DbType, RowValues};
