use std::sync::Arc;

use rstest::rstest;

use asa_dialect::catalog::queries::V12_QUERIES;
use asa_dialect::catalog::version::VERSION_QUERY;
use asa_dialect::catalog::{SchemaError, ServerVersionFamily};
use asa_dialect::data_types::{AbstractType, DefaultValue};
use asa_dialect::schema::ForeignKeyDescriptor;

use crate::fixtures::{context_for, sales_tables, server, FakeServer};

#[rstest]
#[case("9.0.2.3951", ServerVersionFamily::V9, "")]
#[case("11.0.1.2044", ServerVersionFamily::V11, "")]
#[case("12.0.1.3152", ServerVersionFamily::V12, "orders_seq")]
#[case("16.0.0.2546", ServerVersionFamily::V12, "orders_seq")]
#[tokio::test]
async fn test_load_table_across_families(
    #[case] version: &str,
    #[case] family: ServerVersionFamily,
    #[case] sequence_name: &str,
) {
    let context = context_for(Arc::new(FakeServer::new(version, sales_tables())));
    assert_eq!(context.server_version().await.unwrap(), family);

    let orders = context.load_table_schema("Orders").await.unwrap().unwrap();

    assert_eq!(orders.name.full_name, "Orders");
    assert_eq!(orders.name.schema_name, "dba");
    assert_eq!(orders.primary_key, vec!["id"]);
    assert_eq!(orders.sequence_name.as_deref(), Some(sequence_name));
    assert_eq!(
        orders.column_names(),
        vec!["id", "customer_id", "placed_at", "total", "note"]
    );

    let id = orders.column("id").unwrap();
    assert_eq!(id.is_primary_key, Some(true));
    assert!(id.auto_increment);
    assert_eq!(id.default_value, None);

    let placed_at = orders.column("placed_at").unwrap();
    assert_eq!(placed_at.abstract_type, AbstractType::Timestamp);
    assert_eq!(placed_at.default_value, None);

    let total = orders.column("total").unwrap();
    assert_eq!(total.abstract_type, AbstractType::Decimal);
    assert_eq!((total.precision, total.scale), (Some(12), Some(2)));
    assert_eq!(
        total.default_value,
        Some(DefaultValue::String("0.00".to_string()))
    );

    let note = orders.column("NOTE").unwrap();
    assert_eq!(note.abstract_type, AbstractType::Text);
    assert!(note.allow_null);
    assert_eq!(note.is_primary_key, Some(false));

    assert_eq!(
        orders.foreign_keys,
        vec![ForeignKeyDescriptor {
            referenced_table: "Customers".to_string(),
            columns: vec![("customer_id".to_string(), "id".to_string())],
        }]
    );
}

#[rstest]
#[tokio::test]
async fn test_composite_primary_key(server: Arc<FakeServer>) {
    let context = context_for(server);

    let lines = context
        .load_table_schema("[dba].[OrderLines]")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(lines.primary_key, vec!["order_id", "line_no"]);
    assert_eq!(lines.sequence_name, None);
    assert!(lines.columns.values().filter(|c| c.is_primary_key()).count() == 2);
    assert_eq!(
        lines.column("qty").unwrap().default_value,
        Some(DefaultValue::Integer(1))
    );
    assert_eq!(
        lines.column("line_no").unwrap().abstract_type,
        AbstractType::SmallInt
    );
}

#[rstest]
#[tokio::test]
async fn test_ambiguous_bare_name(server: Arc<FakeServer>) {
    let context = context_for(server.clone());

    match context.load_table_schema("Notes").await {
        Err(SchemaError::AmbiguousTableName { name, owners }) => {
            assert_eq!(name, "Notes");
            assert_eq!(owners, 2);
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(server.issued(V12_QUERIES.columns), 0);

    let bobs = context.load_table_schema("bob.Notes").await.unwrap().unwrap();
    assert_eq!(bobs.name.full_name, "bob.Notes");
    assert!(bobs.column("body").unwrap().allow_null);

    let ours = context.load_table_schema("dba.notes").await.unwrap().unwrap();
    assert_eq!(ours.name.full_name, "notes");
    assert!(!ours.column("body").unwrap().allow_null);
}

#[rstest]
#[tokio::test]
async fn test_missing_table(server: Arc<FakeServer>) {
    let context = context_for(server.clone());

    assert_eq!(context.load_table_schema("Invoices").await.unwrap(), None);
    assert_eq!(server.issued(V12_QUERIES.primary_keys), 1);
    assert_eq!(server.issued(V12_QUERIES.foreign_keys), 0);
}

#[rstest]
#[tokio::test]
async fn test_wrong_version_override_fails_loudly(server: Arc<FakeServer>) {
    let context = context_for(server.clone()).with_server_version(9).unwrap();

    assert!(matches!(
        context.load_table_schema("Orders").await,
        Err(SchemaError::Query { .. })
    ));
    assert_eq!(server.issued(VERSION_QUERY), 0);
}

#[rstest]
#[tokio::test]
async fn test_cache_invalidation(server: Arc<FakeServer>) {
    let context = context_for(server.clone());

    context.load_table_schema("Orders").await.unwrap();
    context.load_table_schema("orders").await.unwrap();
    assert_eq!(server.issued(V12_QUERIES.columns), 1);

    context.invalidate_table("dba.Orders").await;
    context.load_table_schema("Orders").await.unwrap();
    assert_eq!(server.issued(V12_QUERIES.columns), 2);

    context.invalidate_all();
    context.load_table_schema("Orders").await.unwrap();
    assert_eq!(server.issued(V12_QUERIES.columns), 3);
    assert_eq!(server.issued(VERSION_QUERY), 2);
}

#[rstest]
#[tokio::test]
async fn test_table_names(server: Arc<FakeServer>) {
    let context = context_for(server);

    assert_eq!(
        context.table_names("").await.unwrap(),
        vec!["Customers", "Orders", "OrderLines", "Notes", "OpenOrders"]
    );
    assert_eq!(context.table_names("BOB").await.unwrap(), vec!["Notes"]);
    assert!(context.table_names("nobody").await.unwrap().is_empty());
}

#[rstest]
#[case("17.0.10.5963", "ALTER SEQUENCE [orders_seq] RESTART WITH 10")]
#[case("11.0.1.2044", "CALL sa_reset_identity('Orders', 'dba', 9)")]
#[tokio::test]
async fn test_reset_sequence(#[case] version: &str, #[case] expected: &str) {
    let context = context_for(Arc::new(FakeServer::new(version, sales_tables())));

    assert_eq!(
        context.reset_sequence("Orders", Some(10)).await.unwrap(),
        Some(expected.to_string())
    );
    assert_eq!(context.reset_sequence("OrderLines", Some(3)).await.unwrap(), None);
    assert_eq!(context.reset_sequence("Invoices", Some(3)).await.unwrap(), None);
}

#[rstest]
#[tokio::test]
async fn test_concurrent_loads_agree(server: Arc<FakeServer>) {
    let context = context_for(server);

    let (first, second) = tokio::join!(
        context.load_table_schema("Orders"),
        context.load_table_schema("orders")
    );
    let (first, second) = (first.unwrap().unwrap(), second.unwrap().unwrap());

    assert_eq!(first, second);
    assert_eq!(first.column_names().len(), 5);
    assert_eq!(first.foreign_keys.len(), 1);
}
