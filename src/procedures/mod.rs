//! Routines that return several result sets, each mapped to its own element type.
//!
//! A [`ReaderProcedure`] is generic over a tuple `(T1, ..., TN)` with `N` from 1 to 8. Each
//! position gets a [`DatabaseReaderMapper`], taken from the caller or resolved through a
//! [`MapperRegistry`], and execution returns `(Vec<T1>, ..., Vec<TN>)`.

mod executor;
mod mapper;
mod registry;

pub use executor::{ProcedureParameters, ReaderProcedure, ResultTuple};
pub use mapper::{DatabaseReaderMapper, FromRow, FromRowMapper, RowMapper, read_row};
pub use registry::MapperRegistry;
