//! Tests for the T-SQL dialect

use crate::dialect::MssqlDialect;
use remodel_core::{FieldType, RemodelError, SqlDialect};

#[test]
fn dialect_id() {
    assert_eq!(MssqlDialect::new().id(), "mssql");
}

#[test]
fn quotes_identifiers_with_brackets() {
    let dialect = MssqlDialect::new();
    assert_eq!(dialect.quote_identifier("orders"), "[orders]");
    assert_eq!(dialect.quote_identifier("select"), "[select]");
    // Closing brackets are doubled.
    assert_eq!(dialect.quote_identifier("odd]name"), "[odd]]name]");
}

#[test]
fn quotes_string_literals() {
    let dialect = MssqlDialect::new();
    assert_eq!(dialect.quote_string("hello"), "'hello'");
    assert_eq!(dialect.quote_string("it's"), "'it''s'");
}

#[test]
fn limit_without_offset_uses_top() {
    let dialect = MssqlDialect::new();
    assert_eq!(dialect.limit_clause(10, None), "TOP 10");
    assert_eq!(dialect.limit_clause(5, Some(0)), "TOP 5");
}

#[test]
fn limit_with_offset_uses_fetch() {
    let dialect = MssqlDialect::new();
    assert_eq!(
        dialect.limit_clause(10, Some(20)),
        "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn field_ddl_overrides() {
    let dialect = MssqlDialect::new();
    assert_eq!(dialect.field_ddl(FieldType::Bool), Some("tinyint"));
    assert_eq!(dialect.field_ddl(FieldType::Double), Some("float(53)"));
    assert_eq!(dialect.field_ddl(FieldType::VarChar), Some("nvarchar"));
    assert_eq!(dialect.field_ddl(FieldType::Char), Some("nchar"));
    assert_eq!(dialect.field_ddl(FieldType::Text), Some("nvarchar(max)"));
    assert_eq!(dialect.field_ddl(FieldType::Blob), Some("varbinary"));
    assert_eq!(dialect.field_ddl(FieldType::Uuid), Some("nchar(40)"));
    assert_eq!(
        dialect.field_ddl(FieldType::AutoIncrement),
        Some("int identity")
    );
    assert_eq!(dialect.field_ddl(FieldType::DateTime), Some("datetime2"));
}

#[test]
fn unsupported_operations_fail_loudly() {
    let dialect = MssqlDialect::new();

    let upsert = dialect.build_upsert_clause("orders", &["id", "total"], &["id"]);
    assert!(matches!(upsert, Err(RemodelError::Unsupported(_))));

    assert!(matches!(
        dialect.extract_date_part("year", "created_at"),
        Err(RemodelError::Unsupported(_))
    ));
    assert!(matches!(
        dialect.truncate_date("month", "created_at"),
        Err(RemodelError::Unsupported(_))
    ));
    assert!(matches!(
        dialect.to_timestamp("created_at"),
        Err(RemodelError::Unsupported(_))
    ));
    assert!(matches!(
        dialect.from_timestamp("created_ts"),
        Err(RemodelError::Unsupported(_))
    ));
}

#[test]
fn unsupported_errors_name_the_dialect() {
    let err = MssqlDialect::new()
        .to_timestamp("created_at")
        .unwrap_err();
    assert!(err.to_string().contains("mssql"));
    assert!(err.to_string().contains("not implemented"));
}
