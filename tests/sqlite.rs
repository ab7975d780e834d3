use std::sync::Arc;

use sqlx::Executor;

use asa_dialect::catalog::queries::V12_QUERIES;
use asa_dialect::catalog::SchemaError;
use asa_dialect::context::DialectContext;
use asa_dialect::executor::{QueryExecutor, SqlxExecutor};

/// An SQLite database with a tiny slice of the `SYS` catalog attached
async fn make_executor() -> SqlxExecutor {
    let executor = SqlxExecutor::try_new("sqlite::memory:", 1)
        .await
        .expect("Error setting up the database");

    for statement in [
        "ATTACH DATABASE ':memory:' AS SYS",
        "CREATE TABLE SYS.SYSUSER (user_id INTEGER, user_name TEXT)",
        "CREATE TABLE SYS.SYSTABLE (table_id INTEGER, table_name TEXT, creator INTEGER, table_type TEXT)",
        "CREATE TABLE SYS.SYSCOLUMN (table_id INTEGER, column_id INTEGER, column_name TEXT, pkey TEXT)",
        "CREATE TABLE SYS.SYSIDXCOL (table_id INTEGER, index_id INTEGER, column_id INTEGER, sequence INTEGER)",
        "INSERT INTO SYS.SYSUSER VALUES (0, 'SYS'), (1, 'DBA'), (2, 'bob'), (3, 'rs_systabgroup')",
        "INSERT INTO SYS.SYSTABLE VALUES
            (1, 'SYSTABLE', 0, 'BASE'),
            (10, 'Orders', 1, 'BASE'),
            (11, 'Notes', 1, 'BASE'),
            (12, 'Notes', 2, 'BASE'),
            (13, 'OpenOrders', 1, 'VIEW'),
            (14, 'orders_tmp', 1, 'GBL TEMP'),
            (15, 'rs_lastcommit', 3, 'BASE')",
        "INSERT INTO SYS.SYSCOLUMN VALUES (10, 1, 'id', 'Y'), (10, 2, 'total', 'N')",
        "INSERT INTO SYS.SYSIDXCOL VALUES (10, 0, 1, 0)",
    ] {
        executor.executor.execute(statement).await.unwrap();
    }

    executor
}

#[tokio::test]
async fn test_owner_count_detects_ambiguity() {
    let context = DialectContext::new(Arc::new(make_executor().await), "DBA")
        .with_server_version(17)
        .unwrap();

    assert!(matches!(
        context.load_table_schema("notes").await,
        Err(SchemaError::AmbiguousTableName { owners: 2, .. })
    ));
}

#[tokio::test]
async fn test_table_names_query() {
    let context = DialectContext::new(Arc::new(make_executor().await), "dba")
        .with_server_version(16)
        .unwrap();

    assert_eq!(
        context.table_names("").await.unwrap(),
        vec!["Notes", "OpenOrders", "Orders"]
    );
    assert_eq!(context.table_names("bob").await.unwrap(), vec!["Notes"]);
}

#[tokio::test]
async fn test_primary_key_query() {
    let executor = make_executor().await;

    let rows = executor
        .fetch_all(
            V12_QUERIES.primary_keys,
            &[("tableName", "ORDERS"), ("schemaName", "dba")],
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text("field_name").unwrap(), "id");
}

// The columns query relies on catalog relations this database doesn't have,
// which the loader reports as a missing table
#[tokio::test]
async fn test_failing_columns_query_means_absent() {
    let context = DialectContext::new(Arc::new(make_executor().await), "dba")
        .with_server_version(12)
        .unwrap();

    assert_eq!(context.load_table_schema("Orders").await.unwrap(), None);
}
