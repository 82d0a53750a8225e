//! Bundled `SQLite` backend over `rusqlite`.
//!
//! - `config`: connection options and their builder
//! - `params`: conversion from [`crate::types::RowValues`] to `SQLite` values and named binding
//! - `query`: result extraction into [`crate::results::ResultSet`]
//! - `executor`: statement-by-statement execution of merged commands
//! - `connector`: the [`crate::connector::DatabaseConnector`] implementation

pub mod config;
pub mod connector;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connector::SqliteConnector;
pub use executor::execute_statements;
pub use params::row_value_to_sqlite_value;
pub use query::build_result_set;
