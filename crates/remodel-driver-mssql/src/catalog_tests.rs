//! Tests for the raw catalog rows, cache, and projections

use crate::catalog::{
    CatalogCache, ConstraintKind, ConstraintRow, RAW_METADATA_SQL, columns_from,
    foreign_keys_from, indexes_from, parse_constraint_rows, primary_keys_from,
};
use remodel_core::{QueryResult, Row, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

fn row(column: &str, data_type: &str, constraint: Option<ConstraintKind>) -> ConstraintRow {
    ConstraintRow {
        column: column.to_string(),
        default: None,
        nullable: false,
        data_type: data_type.to_string(),
        max_length: None,
        referential_constraint: None,
        referenced_table: None,
        referenced_column: None,
        constraint,
    }
}

fn fk_row(column: &str, dest_table: &str, dest_column: &str) -> ConstraintRow {
    ConstraintRow {
        referential_constraint: Some(format!("FK_orders_{}", dest_table)),
        referenced_table: Some(dest_table.to_string()),
        referenced_column: Some(dest_column.to_string()),
        constraint: Some(ConstraintKind::ForeignKey),
        ..row(column, "int", None)
    }
}

/// The synthetic `orders` catalog: an int primary key, a foreign key into
/// `customers`, and a plain column, ordered the way the catalog query
/// returns them (constraint names descending, unconstrained rows last).
fn orders_rows() -> Vec<ConstraintRow> {
    vec![
        row("id", "int", Some(ConstraintKind::PrimaryKey)),
        fk_row("customer_id", "customers", "id"),
        row("total", "decimal", None),
    ]
}

#[test]
fn orders_columns_project_per_row() {
    let columns = columns_from(&orders_rows(), "orders");

    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].name, "id");
    assert!(columns[0].primary_key);
    assert_eq!(columns[0].table, "orders");
    assert!(!columns[1].primary_key);
    assert_eq!(columns[2].data_type, "decimal");
}

#[test]
fn orders_primary_keys() {
    assert_eq!(primary_keys_from(&orders_rows()), vec!["id".to_string()]);
}

#[test]
fn orders_foreign_keys() {
    let fks = foreign_keys_from(&orders_rows(), "orders");

    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].column, "customer_id");
    assert_eq!(fks[0].dest_table, "customers");
    assert_eq!(fks[0].dest_column, "id");
    assert_eq!(fks[0].table, "orders");
}

#[test]
fn orders_indexes_synthesized_from_constraints() {
    let indexes = indexes_from(&orders_rows(), "orders");

    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].column, "id");
    assert_eq!(indexes[0].name, "id");
    assert!(indexes[0].unique);
    assert_eq!(indexes[0].sql, "");
    assert_eq!(indexes[0].table, "orders");
}

#[test]
fn primary_keys_are_a_subset_of_flagged_columns() {
    let rows = orders_rows();
    let flagged: Vec<String> = columns_from(&rows, "orders")
        .into_iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name)
        .collect();

    for key in primary_keys_from(&rows) {
        assert!(flagged.contains(&key));
    }
}

#[test]
fn primary_keys_deduplicate_repeated_constraint_rows() {
    let rows = vec![
        row("id", "int", Some(ConstraintKind::PrimaryKey)),
        row("id", "int", Some(ConstraintKind::PrimaryKey)),
    ];
    assert_eq!(primary_keys_from(&rows), vec!["id".to_string()]);
}

// One row per constraint means a column under both a PRIMARY KEY and a
// UNIQUE constraint reports a different primary_key flag on each entry.
// Intentional behavior of the row-per-constraint representation.
#[test]
fn duplicate_constraint_rows_keep_per_row_primary_key_flag() {
    let rows = vec![
        row("email", "nvarchar", Some(ConstraintKind::Unique)),
        row("email", "nvarchar", Some(ConstraintKind::PrimaryKey)),
    ];

    let columns = columns_from(&rows, "users");
    assert_eq!(columns.len(), 2);
    assert!(!columns[0].primary_key);
    assert!(columns[1].primary_key);

    // The distinct views stay consistent regardless.
    assert_eq!(primary_keys_from(&rows), vec!["email".to_string()]);
    let indexes = indexes_from(&rows, "users");
    assert_eq!(indexes.len(), 2);
    assert!(indexes.iter().all(|i| i.unique));
}

#[test]
fn check_constraints_do_not_become_indexes() {
    let rows = vec![row("age", "int", Some(ConstraintKind::Check))];
    assert!(indexes_from(&rows, "users").is_empty());
    assert!(primary_keys_from(&rows).is_empty());
}

#[test]
fn constraint_kind_parses_catalog_spellings() {
    assert_eq!(
        ConstraintKind::parse("PRIMARY KEY"),
        Some(ConstraintKind::PrimaryKey)
    );
    assert_eq!(
        ConstraintKind::parse("FOREIGN KEY"),
        Some(ConstraintKind::ForeignKey)
    );
    assert_eq!(ConstraintKind::parse("UNIQUE"), Some(ConstraintKind::Unique));
    assert_eq!(ConstraintKind::parse("CHECK"), Some(ConstraintKind::Check));
    assert_eq!(ConstraintKind::parse("primary key"), None);
    assert_eq!(ConstraintKind::parse(""), None);
}

fn catalog_result(rows: Vec<Vec<Value>>) -> QueryResult {
    let names: Vec<String> = [
        "COLUMN_NAME",
        "COLUMN_DEFAULT",
        "IS_NULLABLE",
        "DATA_TYPE",
        "CHARACTER_MAXIMUM_LENGTH",
        "UNIQUE_CONSTRAINT_NAME",
        "TABLE_NAME",
        "COLUMN_NAME",
        "CONSTRAINT_TYPE",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    QueryResult {
        columns: Vec::new(),
        rows: rows
            .into_iter()
            .map(|values| Row::new(names.clone(), values))
            .collect(),
        affected_rows: 0,
        execution_time_ms: 0,
    }
}

#[test]
fn parses_rows_in_select_order() {
    let result = catalog_result(vec![
        vec![
            Value::String("id".to_string()),
            Value::Null,
            Value::String("NO".to_string()),
            Value::String("int".to_string()),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::String("PRIMARY KEY".to_string()),
        ],
        vec![
            Value::String("name".to_string()),
            Value::String("(N'unnamed')".to_string()),
            Value::String("YES".to_string()),
            Value::String("nvarchar".to_string()),
            Value::Int32(100),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
        ],
    ]);

    let rows = parse_constraint_rows(&result);
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].column, "id");
    assert!(!rows[0].nullable);
    assert_eq!(rows[0].constraint, Some(ConstraintKind::PrimaryKey));
    assert_eq!(rows[0].max_length, None);

    assert_eq!(rows[1].column, "name");
    assert!(rows[1].nullable);
    assert_eq!(rows[1].default.as_deref(), Some("(N'unnamed')"));
    assert_eq!(rows[1].max_length, Some(100));
    assert_eq!(rows[1].constraint, None);
}

#[test]
fn parses_foreign_key_reference_columns() {
    let result = catalog_result(vec![vec![
        Value::String("customer_id".to_string()),
        Value::Null,
        Value::String("NO".to_string()),
        Value::String("int".to_string()),
        Value::Null,
        Value::String("PK_customers".to_string()),
        Value::String("customers".to_string()),
        Value::String("id".to_string()),
        Value::String("FOREIGN KEY".to_string()),
    ]]);

    let rows = parse_constraint_rows(&result);
    assert_eq!(rows[0].referential_constraint.as_deref(), Some("PK_customers"));
    assert_eq!(rows[0].referenced_table.as_deref(), Some("customers"));
    assert_eq!(rows[0].referenced_column.as_deref(), Some("id"));
    assert_eq!(rows[0].constraint, Some(ConstraintKind::ForeignKey));
}

#[test]
fn raw_metadata_query_shape() {
    assert!(RAW_METADATA_SQL.contains("INFORMATION_SCHEMA.COLUMNS"));
    assert!(RAW_METADATA_SQL.contains("INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS"));
    assert!(RAW_METADATA_SQL.contains("@P1"));
    assert!(RAW_METADATA_SQL.contains("@P2"));
    assert!(
        RAW_METADATA_SQL
            .trim_end()
            .ends_with("ORDER BY U.CONSTRAINT_NAME DESC")
    );
    // The referenced side of a foreign key needs the second pass over the
    // constraint views.
    assert_eq!(
        RAW_METADATA_SQL
            .matches("INFORMATION_SCHEMA.TABLE_CONSTRAINTS")
            .count(),
        2
    );
    assert_eq!(
        RAW_METADATA_SQL
            .matches("INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE")
            .count(),
        2
    );
}

#[tokio::test]
async fn cache_fetches_once_per_key() {
    let cache = CatalogCache::new();
    let fetches = AtomicUsize::new(0);

    for _ in 0..3 {
        let rows = cache
            .get_or_fetch("dbo", "orders", async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(orders_rows())
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn cache_keys_are_schema_qualified() {
    let cache = CatalogCache::new();
    let fetches = AtomicUsize::new(0);

    for schema in ["dbo", "sales", "dbo"] {
        cache
            .get_or_fetch(schema, "orders", async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(Vec::new())
            })
            .await
            .unwrap();
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn cache_propagates_fetch_errors_without_caching() {
    let cache = CatalogCache::new();

    let err = cache
        .get_or_fetch("dbo", "orders", async {
            Err(remodel_core::RemodelError::Query("boom".to_string()))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, remodel_core::RemodelError::Query(_)));
    assert_eq!(cache.len().await, 0);

    // A later successful fetch still populates the entry.
    cache
        .get_or_fetch("dbo", "orders", async { Ok(orders_rows()) })
        .await
        .unwrap();
    assert_eq!(cache.len().await, 1);
}
