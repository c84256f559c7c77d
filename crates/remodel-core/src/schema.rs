//! Schema introspection trait and metadata records

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One column of a table, as reported by the engine's catalog.
///
/// The catalog join yields one row per (column, constraint) pair, so a
/// column under several constraints appears once per constraint and
/// `primary_key` reflects each row's own constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Engine-native type name (e.g. "nvarchar")
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub table: String,
    pub default: Option<String>,
}

/// A foreign-key relationship from one column to a referenced column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyMetadata {
    pub column: String,
    pub dest_table: String,
    pub dest_column: String,
    pub table: String,
}

/// An index over a single column, possibly synthesized from a uniqueness
/// constraint rather than read from the engine's index catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub name: String,
    /// Index definition SQL; empty when the engine does not expose it.
    pub sql: String,
    pub column: String,
    pub unique: bool,
    pub table: String,
}

/// Catalog introspection interface.
///
/// Every operation takes an optional schema; `None` resolves to the
/// connection's default schema, never to "all schemas".
#[async_trait]
pub trait SchemaIntrospection: Send + Sync {
    /// List table names in a schema, sorted ascending by name
    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<String>>;

    /// Get columns for a table
    async fn get_columns(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnMetadata>>;

    /// Get distinct primary-key column names for a table
    async fn get_primary_keys(&self, table: &str, schema: Option<&str>) -> Result<Vec<String>>;

    /// Get foreign keys for a table
    async fn get_foreign_keys(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ForeignKeyMetadata>>;

    /// Get indexes for a table
    async fn get_indexes(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<IndexMetadata>>;

    /// List sequences in a schema. Engines without discoverable sequences
    /// return `RemodelError::Unsupported`.
    async fn list_sequences(&self, schema: Option<&str>) -> Result<Vec<String>>;
}
