//! remodel core - shared abstractions for the schema-reflection toolkit
//!
//! This crate provides the traits and types the reflection layer and the
//! dialect drivers depend on. It defines:
//!
//! - `Connection` - trait for live database connections
//! - `SchemaIntrospection` - trait for catalog introspection
//! - `SqlDialect` - dialect-specific SQL construction
//! - `DatabaseDriver` - trait for driver/connection factories
//! - Common types like `Value`, `Row`, `QueryResult`, and the portable
//!   `FieldType` vocabulary

mod connection;
mod dialect;
mod driver;
mod error;
mod fields;
mod schema;
mod types;

pub use connection::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use fields::*;
pub use schema::*;
pub use types::*;
