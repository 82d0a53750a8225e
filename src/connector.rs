//! The narrow contracts through which the engine reaches a backend.

use std::sync::Arc;

use crate::command::Command;
use crate::config::BatchLimits;
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::types::RowValues;

/// Forward-only cursor over the result sets of one executed command.
pub trait DatabaseReader {
    /// Advance to the next row of the current result set.
    ///
    /// # Errors
    /// Transport failures while fetching.
    fn read(&mut self) -> Result<bool, SqlBatchError>;

    /// Number of fields in the current result set.
    fn field_count(&self) -> usize;

    /// Column names of the current result set.
    fn column_names(&self) -> &[String];

    /// Value of field `ordinal` on the current row.
    ///
    /// # Errors
    /// Returns an error when no row is current or the ordinal is out of range.
    fn get_value(&self, ordinal: usize) -> Result<RowValues, SqlBatchError>;

    /// Value of the named field on the current row.
    ///
    /// # Errors
    /// Returns `SqlBatchError::ArgumentError` for unknown columns.
    fn get_value_by_name(&self, column: &str) -> Result<RowValues, SqlBatchError> {
        let ordinal = self
            .column_names()
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| {
                SqlBatchError::ArgumentError(format!("column {column} is not in the result set"))
            })?;
        self.get_value(ordinal)
    }

    /// Whether the reader is positioned on a result set at all. A command that returned no
    /// result sets yields a reader for which this is `false` from the start.
    fn has_result_set(&self) -> bool;

    /// Move to the next result set. Returns `false` once no result set remains.
    ///
    /// # Errors
    /// Transport failures while advancing.
    fn next_result(&mut self) -> Result<bool, SqlBatchError>;
}

/// A synchronous connection to one backend.
///
/// Implementations must not reorder result sets: the n-th row-returning statement of a command
/// is the n-th result set of its reader.
pub trait DatabaseConnector {
    /// Syntax rules of this backend.
    fn format_provider(&self) -> Arc<dyn CommandFormatProvider>;

    /// Transport limits applied to merged commands.
    fn limits(&self) -> BatchLimits;

    /// Create an empty command over `text`.
    fn create_command(&self, text: &str) -> Command {
        Command::new(text)
    }

    /// Execute a command for its affected-row count.
    ///
    /// # Errors
    /// Transport failures, passed through unchanged.
    fn execute_non_query(&self, command: &Command) -> Result<usize, SqlBatchError>;

    /// Execute a command and return a reader positioned before the first row of the first result
    /// set.
    ///
    /// # Errors
    /// Transport failures, passed through unchanged.
    fn execute_reader(&self, command: &Command) -> Result<Box<dyn DatabaseReader>, SqlBatchError>;
}
