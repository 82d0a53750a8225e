use std::cell::Cell;

use sql_batcher::prelude::*;
use sql_batcher::test_utils::ScriptedConnector;

fn touch(id: i64) -> CommandBatchStep<'static> {
    let mut command = Command::new("UPDATE t SET seen=1 WHERE id=@id");
    command.add_parameter(CommandParameter::new("@id", RowValues::Int(id)));
    CommandBatchStep::new(command)
}

#[test]
fn rotates_on_transport_step_limit() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Mssql).with_limits(
        BatchLimits::builder().max_commands_per_batch(3).finish()?,
    );
    let mut manager = BatchManager::new(&connector);
    for id in 0..7 {
        manager.add(touch(id))?;
    }
    assert_eq!(manager.executed_batches(), 2);
    manager.flush()?;
    assert_eq!(manager.executed_batches(), 3);

    let executed = connector.executed();
    let steps: Vec<usize> = executed.iter().map(|c| c.text.matches(';').count()).collect();
    assert_eq!(steps, vec![3, 3, 1]);
    // each batch restarts numbering
    assert!(executed.iter().all(|c| c.text.starts_with("UPDATE t SET seen=1 WHERE id=@p0;")));
    Ok(())
}

#[test]
fn rotates_on_parameter_limit() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Mssql).with_limits(
        BatchLimits::builder().max_parameters_per_command(4).finish()?,
    );
    let mut manager = BatchManager::new(&connector);
    for id in 0..10 {
        manager.add(touch(id))?;
    }
    manager.flush()?;
    assert_eq!(manager.executed_batches(), 3);
    let sizes: Vec<usize> = connector
        .executed()
        .iter()
        .map(|c| c.parameters.len())
        .collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    Ok(())
}

#[test]
fn callbacks_survive_rotation() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Postgres);
    for value in [10, 20] {
        connector.push_result_sets(vec![ResultSet::from_rows(
            vec!["v"],
            vec![vec![RowValues::Int(value)]],
        )]);
    }
    let total = Cell::new(0i64);
    let mut manager = BatchManager::new(&connector).with_max_count(1);

    for _ in 0..2 {
        let step = CommandBatchStep::with_callback(Command::new("SELECT v FROM t"), |reader| {
            while reader.read()? {
                if let Some(v) = reader.get_value(0)?.as_int() {
                    total.set(total.get() + v);
                }
            }
            Ok(())
        });
        manager.add(step)?;
    }
    manager.flush()?;

    assert_eq!(total.get(), 30);
    assert_eq!(manager.executed_batches(), 2);
    Ok(())
}

#[test]
fn transport_failure_during_rotation_propagates() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Mssql);
    let mut manager = BatchManager::new(&connector).with_max_count(1);
    manager.add(touch(1))?;

    connector.fail_next("link down");
    let err = manager.add(touch(2)).unwrap_err();
    assert!(matches!(err, SqlBatchError::TransportError(_)));
    assert_eq!(manager.executed_batches(), 0);
    Ok(())
}
