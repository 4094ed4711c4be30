//! Integration tests for reconciliation against a scripted connection.

mod common;

use oxide_schema_core::prelude::*;

use common::{column_row, users_columns, users_table, ScriptedConnection};

fn reconciler(connection: ScriptedConnection) -> Reconciler<ScriptedConnection> {
    Reconciler::new(connection, SchemaContext::new("app").unwrap())
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn test_context_from_connection() {
    let mut connection = ScriptedConnection::new("inventory");
    let ctx = SchemaContext::from_connection(&mut connection, &MySqlDialect).unwrap();
    assert_eq!(ctx.schema(), "inventory");
    assert_eq!(connection.queries, vec!["SELECT DATABASE()".to_string()]);
}

#[test]
fn test_context_without_selected_schema() {
    let mut connection = ScriptedConnection::default();
    assert!(matches!(
        SchemaContext::from_connection(&mut connection, &MySqlDialect),
        Err(SchemaError::SchemaUninitialized)
    ));
    assert!(matches!(
        Reconciler::from_connection(ScriptedConnection::default()),
        Err(SchemaError::SchemaUninitialized)
    ));
}

// =============================================================================
// add_or_pass
// =============================================================================

#[test]
fn test_add_or_pass_creates_absent_table_once() {
    let mut r = reconciler(ScriptedConnection::new("app"));
    let table = users_table();

    assert_eq!(r.add_or_pass(&table).unwrap(), ReconcileOutcome::Added);
    assert_eq!(r.connection().creates(), 1);
    assert_eq!(
        r.connection().executed[0],
        table.render(r.context()).unwrap()
    );

    assert_eq!(r.add_or_pass(&table).unwrap(), ReconcileOutcome::Unchanged);
    assert_eq!(r.connection().creates(), 1);
}

#[test]
fn test_add_or_pass_leaves_existing_table_alone() {
    let connection = ScriptedConnection::new("app").with_table("users", Vec::new());
    let mut r = reconciler(connection);
    assert_eq!(r.add_or_pass(&users_table()).unwrap(), ReconcileOutcome::Unchanged);
    assert!(r.connection().executed.is_empty());
    assert_eq!(
        r.connection().queries,
        vec!["SHOW TABLES FROM `app` LIKE 'users'".to_string()]
    );
}

#[test]
fn test_table_lookup_ignores_name_case() {
    let connection = ScriptedConnection::new("app").with_table("users", users_columns());
    let mut r = reconciler(connection);
    let table = TableSpec::new("Users", users_table().columns().to_vec());

    assert!(r.table_exists("Users").unwrap());
    assert_eq!(r.add_or_pass(&table).unwrap(), ReconcileOutcome::Unchanged);
    assert_eq!(r.add_or_update(&table).unwrap(), ReconcileOutcome::Unchanged);
    assert!(r.connection().executed.is_empty());
}

#[test]
fn test_add_or_pass_renders_before_querying() {
    let table = TableSpec::new(
        "broken",
        vec![
            ColumnSpec::new("a", INT).unwrap().auto_increment(true).unwrap(),
            ColumnSpec::new("b", INT).unwrap().auto_increment(true).unwrap(),
        ],
    );
    let mut r = reconciler(ScriptedConnection::new("app"));
    let result = r.add_or_pass(&table);
    assert!(matches!(result, Err(SchemaError::MultipleAutoIncrement { .. })));
    assert_eq!(ReconcileOutcome::of(&result), ReconcileOutcome::Failed);
    assert!(r.connection().queries.is_empty());
    assert!(r.connection().executed.is_empty());
}

#[test]
fn test_query_failure_wraps_connection_error() {
    let connection = ScriptedConnection::new("app").failing_on("SHOW TABLES");
    let mut r = reconciler(connection);
    let result = r.add_or_pass(&users_table());
    match &result {
        Err(SchemaError::QueryFailure { sql, source }) => {
            assert!(sql.starts_with("SHOW TABLES FROM `app`"));
            assert!(source.to_string().contains("scripted failure"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(ReconcileOutcome::of(&result), ReconcileOutcome::Failed);
}

#[test]
fn test_failed_create_is_query_failure() {
    let connection = ScriptedConnection::new("app").failing_on("CREATE TABLE");
    let mut r = reconciler(connection);
    assert!(matches!(
        r.add_or_pass(&users_table()),
        Err(SchemaError::QueryFailure { .. })
    ));
}

// =============================================================================
// add_or_update
// =============================================================================

#[test]
fn test_add_or_update_creates_absent_table() {
    let mut r = reconciler(ScriptedConnection::new("app"));
    assert_eq!(r.add_or_update(&users_table()).unwrap(), ReconcileOutcome::Added);
    assert_eq!(r.connection().creates(), 1);
}

#[test]
fn test_add_or_update_matching_table_is_unchanged() {
    let connection = ScriptedConnection::new("app").with_table("users", users_columns());
    let mut r = reconciler(connection);
    assert_eq!(
        r.add_or_update(&users_table()).unwrap(),
        ReconcileOutcome::Unchanged
    );
    assert!(r.connection().executed.is_empty());
}

#[test]
fn test_add_or_update_alters_drifted_table() {
    let live = vec![
        column_row("id", "int(11)", false, "PRI", "auto_increment"),
        column_row("name", "varchar(40)", true, "", ""),
        column_row("nickname", "varchar(20)", true, "", ""),
    ];
    let connection = ScriptedConnection::new("app").with_table("users", live);
    let mut r = reconciler(connection);

    assert_eq!(
        r.add_or_update(&users_table()).unwrap(),
        ReconcileOutcome::Updated
    );
    assert_eq!(
        r.connection().executed,
        vec![
            "ALTER TABLE `app`.`users` ADD COLUMN `active` BOOLEAN DEFAULT true AFTER `name`, \
             MODIFY COLUMN `name` VARCHAR(100) NOT NULL, DROP COLUMN `nickname`;"
                .to_string()
        ]
    );
}

#[test]
fn test_add_or_update_refuses_unkeyed_auto_increment() {
    let live = vec![
        column_row("uuid", "char(36)", false, "PRI", ""),
        column_row("name", "varchar(100)", false, "", ""),
        column_row("active", "tinyint(1)", true, "", ""),
    ];
    let connection = ScriptedConnection::new("app").with_table("users", live);
    let mut r = reconciler(connection);

    let result = r.add_or_update(&users_table());
    assert!(matches!(
        result,
        Err(SchemaError::UnkeyedAutoIncrement { ref column, .. }) if column == "id"
    ));
    assert_eq!(ReconcileOutcome::of(&result), ReconcileOutcome::Failed);
    assert!(r.connection().executed.is_empty());
}

#[test]
fn test_plan_does_not_execute() {
    let connection = ScriptedConnection::new("app").with_table("users", users_columns());
    let mut r = reconciler(connection);
    let table = users_table().column(ColumnSpec::new("age", SMALLINT).unwrap());

    let diff = r.plan(&table, None).unwrap().unwrap();
    assert_eq!(diff.changes.len(), 1);
    assert!(r.connection().executed.is_empty());

    assert!(r
        .plan(&TableSpec::new("absent", Vec::new()), None)
        .unwrap()
        .is_none());
}

// =============================================================================
// update
// =============================================================================

#[test]
fn test_update_renames_and_alters() {
    let connection = ScriptedConnection::new("app").with_table("people", users_columns());
    let mut r = reconciler(connection);
    let table = users_table().column(ColumnSpec::new("age", SMALLINT).unwrap().unsigned(true).unwrap());

    let outcome = r.update(&table.to_update("people")).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Updated);
    assert_eq!(
        r.connection().executed,
        vec![
            "ALTER TABLE `app`.`people` RENAME TO `app`.`users`;".to_string(),
            "ALTER TABLE `app`.`users` ADD COLUMN `age` SMALLINT UNSIGNED AFTER `active`;"
                .to_string(),
        ]
    );
    assert!(r.connection().tables.contains_key("users"));
    assert!(!r.connection().tables.contains_key("people"));
}

#[test]
fn test_update_of_missing_table() {
    let mut r = reconciler(ScriptedConnection::new("app"));
    let result = r.update(&users_table().to_update("people"));
    assert!(matches!(result, Err(SchemaError::TableNotFound(ref t)) if t == "people"));
    assert!(r.connection().executed.is_empty());
}

#[test]
fn test_update_without_changes_is_unchanged() {
    let connection = ScriptedConnection::new("app").with_table("users", users_columns());
    let mut r = reconciler(connection);
    assert_eq!(
        r.update(&users_table().to_update("users")).unwrap(),
        ReconcileOutcome::Unchanged
    );
}

#[test]
fn test_connection_is_returned() {
    let r = reconciler(ScriptedConnection::new("app"));
    let connection = r.into_inner();
    assert!(connection.close().is_ok());
}
