//! Unit tests for the SQL Server driver

use crate::driver::MssqlDriver;
use remodel_core::{ConnectionConfig, DatabaseDriver, RemodelError};

#[test]
fn driver_identity() {
    let driver = MssqlDriver::new();
    assert_eq!(driver.id(), "mssql");
    assert_eq!(driver.name(), "mssql");
    assert_eq!(driver.display_name(), "SQL Server");
}

#[test]
fn default_port() {
    assert_eq!(MssqlDriver::new().default_port(), Some(1433));
}

#[test]
fn capabilities_reflect_the_unsupported_surface() {
    let caps = MssqlDriver::new().capabilities();

    assert!(!caps.supports_upsert);
    assert!(!caps.supports_sequences);
    assert!(!caps.supports_date_functions);
    assert!(caps.supports_schemas);
    assert!(caps.supports_foreign_keys);
    assert_eq!(caps.max_identifier_length, Some(128));
    assert_eq!(caps.max_parameters, Some(2100));
}

#[test]
fn builds_connection_string_with_credentials() {
    let config = ConnectionConfig::new("db.example.com", 1433)
        .with_database("northwind")
        .with_credentials("sa", "secret");

    let conn_str = MssqlDriver::new().build_connection_string(&config);
    assert_eq!(
        conn_str,
        "Server=db.example.com,1433;Database=northwind;User Id=sa;Password=secret"
    );
}

#[test]
fn builds_trusted_connection_string_without_user() {
    let config = ConnectionConfig::new("localhost", 0);

    let conn_str = MssqlDriver::new().build_connection_string(&config);
    assert_eq!(conn_str, "Server=localhost,1433;Trusted_Connection=True");
}

#[test]
fn connection_string_parsing_is_unsupported() {
    let err = MssqlDriver::new()
        .parse_connection_string("Server=localhost,1433")
        .unwrap_err();
    assert!(matches!(err, RemodelError::Unsupported(_)));
}
