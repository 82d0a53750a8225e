use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::{Batch, Connection};
use tracing::trace;

use super::params::bind_named_parameters;
use super::query::build_result_set;
use crate::command::Command;
use crate::error::SqlBatchError;
use crate::results::ResultSet;

/// Run every statement of a (possibly merged) command in order.
///
/// Row-returning statements are buffered as one result set each; the others contribute their
/// changed-row counts. Parameters are bound per statement by token name.
///
/// # Errors
/// Returns the first `SQLite` or binding failure; statements before it stay applied.
pub fn execute_statements(
    conn: &Connection,
    command: &Command,
) -> Result<(Vec<ResultSet>, usize), SqlBatchError> {
    let mut batch = Batch::new(conn, command.text());
    let mut sets = Vec::new();
    let mut affected = 0;
    let mut statements = 0usize;

    while let Some(mut stmt) = batch.next()? {
        statements += 1;
        bind_named_parameters(&mut stmt, command)?;
        if stmt.column_count() > 0 {
            let set = build_result_set(&mut stmt)?;
            trace!(statement = statements, rows = set.len(), "buffered result set");
            sets.push(set);
        } else {
            let changed = stmt.raw_execute()?;
            trace!(statement = statements, changed, "executed statement");
            affected += changed;
        }
    }

    Ok((sets, affected))
}
