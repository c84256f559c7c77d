//! Microsoft SQL Server dialect adapter for remodel
//!
//! Owns the tiberius connection, answers catalog introspection out of a
//! per-(schema, table) metadata cache built from one composite
//! INFORMATION_SCHEMA query, and maps T-SQL column types onto the portable
//! field vocabulary.

mod catalog;
mod connection;
mod dialect;
mod driver;
mod metadata;
mod schema;

#[cfg(test)]
mod catalog_tests;
#[cfg(test)]
mod connection_tests;
#[cfg(test)]
mod dialect_tests;
#[cfg(test)]
mod driver_tests;
#[cfg(test)]
mod metadata_tests;

pub use connection::{MssqlDatabase, MssqlDatabaseError};
pub use dialect::MssqlDialect;
pub use driver::{MssqlDriver, register_metadata};
pub use metadata::MssqlMetadata;
