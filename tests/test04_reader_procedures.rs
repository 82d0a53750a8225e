use std::collections::HashMap;

use sql_batcher::prelude::*;
use sql_batcher::test_utils::ScriptedConnector;

#[derive(Debug, PartialEq)]
struct Client {
    id: i64,
    name: String,
}

impl FromRow for Client {
    fn from_row(row: &CustomDbRow) -> Result<Self, SqlBatchError> {
        let id = row.get("id").and_then(RowValues::as_int);
        let name = row.get("name").and_then(RowValues::as_text);
        match (id, name) {
            (Some(id), Some(name)) => Ok(Client {
                id,
                name: name.to_string(),
            }),
            _ => Err(SqlBatchError::ExecutionError("malformed client".into())),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Order {
    id: i64,
    client_id: i64,
}

impl FromRow for Order {
    fn from_row(row: &CustomDbRow) -> Result<Self, SqlBatchError> {
        let id = row.get("id").and_then(RowValues::as_int);
        let client_id = row.get("client_id").and_then(RowValues::as_int);
        match (id, client_id) {
            (Some(id), Some(client_id)) => Ok(Order { id, client_id }),
            _ => Err(SqlBatchError::ExecutionError("malformed order".into())),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Total(i64);

impl FromRow for Total {
    fn from_row(row: &CustomDbRow) -> Result<Self, SqlBatchError> {
        row.get_by_index(0)
            .and_then(RowValues::as_int)
            .map(Total)
            .ok_or_else(|| SqlBatchError::ExecutionError("malformed total".into()))
    }
}

struct ClientFilter {
    values: HashMap<String, RowValues>,
}

impl ClientFilter {
    fn named(name: &str) -> Self {
        Self {
            values: HashMap::from([("name".to_string(), RowValues::Text(name.to_string()))]),
        }
    }
}

impl RowSource for ClientFilter {
    fn value(&self, column_name: &str) -> Option<RowValues> {
        self.values.get(column_name).cloned()
    }
}

impl ProcedureParameters for ClientFilter {
    fn parameter_columns() -> Vec<ColumnDescriptor> {
        vec![ColumnDescriptor::new("name", DbType::String).max_size(100)]
    }
}

fn registry() -> MapperRegistry {
    let mut registry = MapperRegistry::new();
    registry
        .register_from_row::<Client>()
        .register_from_row::<Order>()
        .register_from_row::<Total>();
    registry
}

fn three_sets() -> Vec<ResultSet> {
    vec![
        ResultSet::from_rows(
            vec!["id", "name"],
            vec![vec![RowValues::Int(1), RowValues::Text("ann".into())]],
        ),
        ResultSet::from_rows(
            vec!["id", "client_id"],
            vec![
                vec![RowValues::Int(100), RowValues::Int(1)],
                vec![RowValues::Int(101), RowValues::Int(1)],
            ],
        ),
        ResultSet::from_rows(vec!["total"], vec![vec![RowValues::Int(2)]]),
    ]
}

#[test]
fn three_mappers_over_three_result_sets() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Mssql);
    connector.push_result_sets(three_sets());

    let mut procedure = ReaderProcedure::<_, ClientFilter, (Client, Order, Total)>::new(
        &connector,
        "GetClientOrders",
        &registry(),
    )?;
    assert_eq!(procedure.command().text(), "EXEC [GetClientOrders] @name");

    let (clients, orders, totals) = procedure.execute(&ClientFilter::named("ann"))?;
    assert_eq!(
        clients,
        vec![Client {
            id: 1,
            name: "ann".into()
        }]
    );
    assert_eq!(
        orders,
        vec![
            Order {
                id: 100,
                client_id: 1
            },
            Order {
                id: 101,
                client_id: 1
            }
        ]
    );
    assert_eq!(totals, vec![Total(2)]);

    let executed = connector.executed();
    assert_eq!(
        executed[0].parameters[0].value,
        RowValues::Text("ann".into())
    );
    assert_eq!(executed[0].parameters[0].size, Some(100));
    Ok(())
}

#[test]
fn too_few_result_sets_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Mssql);
    let mut sets = three_sets();
    sets.pop();
    connector.push_result_sets(sets);

    let mut procedure = ReaderProcedure::<_, ClientFilter, (Client, Order, Total)>::new(
        &connector,
        "GetClientOrders",
        &registry(),
    )?;
    let err = procedure.execute(&ClientFilter::named("ann")).unwrap_err();
    assert!(matches!(
        err,
        SqlBatchError::MissingResultSet {
            position: 3,
            expected: 3
        }
    ));
    Ok(())
}

#[test]
fn procedures_run_repeatedly_with_new_parameters() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Postgres);
    connector.push_result_sets(three_sets());
    connector.push_result_sets(three_sets());

    let mut procedure = ReaderProcedure::<_, ClientFilter, (Client, Order, Total)>::new(
        &connector,
        "client_orders",
        &registry(),
    )?;
    assert_eq!(procedure.command().text(), r#"CALL "client_orders"(@name)"#);
    procedure.execute(&ClientFilter::named("ann"))?;
    procedure.execute(&ClientFilter::named("bob"))?;

    let values: Vec<RowValues> = connector
        .executed()
        .iter()
        .map(|c| c.parameters[0].value.clone())
        .collect();
    assert_eq!(
        values,
        vec![RowValues::Text("ann".into()), RowValues::Text("bob".into())]
    );
    Ok(())
}

#[test]
fn eight_result_sets_map_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let connector = ScriptedConnector::new(DatabaseType::Sqlite);
    connector.push_result_sets(
        (1..=8)
            .map(|v| ResultSet::from_rows(vec!["total"], vec![vec![RowValues::Int(v)]]))
            .collect(),
    );

    let mut procedure = ReaderProcedure::<
        _,
        (),
        (Total, Total, Total, Total, Total, Total, Total, Total),
    >::from_sql(&connector, "SELECT 1", &registry())?;
    let (a, b, c, d, e, f, g, h) = procedure.execute(&())?;
    let firsts: Vec<i64> = [a, b, c, d, e, f, g, h]
        .iter()
        .map(|set| set[0].0)
        .collect();
    assert_eq!(firsts, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    Ok(())
}
