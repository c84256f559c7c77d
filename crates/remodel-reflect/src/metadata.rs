//! The generic metadata translator contract

use async_trait::async_trait;
use remodel_core::{
    ColumnMetadata, ColumnTypeMap, Connection, ForeignKeyMetadata, IndexMetadata, RemodelError,
    Result, SchemaIntrospection,
};
use std::sync::Arc;

/// Resolve an absent or empty schema argument to the dialect default.
fn normalize_schema<'a>(schema: Option<&'a str>, default: Option<&'a str>) -> Option<&'a str> {
    match schema {
        Some(s) if !s.is_empty() => Some(s),
        _ => default,
    }
}

/// A dialect's bridge between the engine's catalog and the portable field
/// vocabulary.
///
/// The provided accessors normalize an absent schema to `default_schema`
/// and delegate to the connection's introspection interface; dialects
/// supply the type resolution.
#[async_trait]
pub trait Metadata: Send + Sync {
    /// The connection this translator is bound to
    fn connection(&self) -> &Arc<dyn Connection>;

    /// Schema used when callers pass none
    fn default_schema(&self) -> Option<&str> {
        None
    }

    /// Resolve each column of `table` to a portable field type
    async fn resolve_column_types(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<ColumnTypeMap>;

    /// The connection's introspection interface
    fn introspection(&self) -> Result<&dyn SchemaIntrospection> {
        self.connection()
            .as_schema_introspection()
            .ok_or_else(|| {
                RemodelError::Unsupported(format!(
                    "{} connections do not expose schema introspection",
                    self.connection().driver_name()
                ))
            })
    }

    /// List table names in a schema
    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<String>> {
        let schema = normalize_schema(schema, self.default_schema());
        self.introspection()?.list_tables(schema).await
    }

    /// Get columns for a table
    async fn get_columns(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnMetadata>> {
        let schema = normalize_schema(schema, self.default_schema());
        self.introspection()?.get_columns(table, schema).await
    }

    /// Get distinct primary-key column names for a table
    async fn get_primary_keys(&self, table: &str, schema: Option<&str>) -> Result<Vec<String>> {
        let schema = normalize_schema(schema, self.default_schema());
        self.introspection()?.get_primary_keys(table, schema).await
    }

    /// Get foreign keys for a table
    async fn get_foreign_keys(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ForeignKeyMetadata>> {
        let schema = normalize_schema(schema, self.default_schema());
        self.introspection()?.get_foreign_keys(table, schema).await
    }

    /// Get indexes for a table
    async fn get_indexes(&self, table: &str, schema: Option<&str>) -> Result<Vec<IndexMetadata>> {
        let schema = normalize_schema(schema, self.default_schema());
        self.introspection()?.get_indexes(table, schema).await
    }
}
