//! Introspector construction over live connections

use crate::metadata::Metadata;
use crate::registry;
use remodel_core::{
    ColumnMetadata, ColumnTypeMap, Connection, ForeignKeyMetadata, IndexMetadata, RemodelError,
    Result,
};
use std::sync::Arc;

/// A reflection session over one connection: a dialect metadata translator
/// plus the schema it reads from.
pub struct Introspector {
    metadata: Arc<dyn Metadata>,
    schema: Option<String>,
}

impl Introspector {
    /// Wrap an already-constructed translator
    pub fn new(metadata: Arc<dyn Metadata>, schema: Option<&str>) -> Self {
        Self {
            metadata,
            schema: schema.map(String::from),
        }
    }

    /// Build an introspector for a connected database.
    ///
    /// Built-in dialect detection runs first. A dialect nothing built-in
    /// recognizes fails with `UnrecognizedDialect`; that error, and only
    /// that error, is converted into a lookup through the resolver registry.
    /// Every other failure propagates unchanged, and so does the original
    /// error when no registered resolver accepts the connection.
    pub fn from_connection(conn: Arc<dyn Connection>, schema: Option<&str>) -> Result<Self> {
        match builtin_metadata(&conn) {
            Ok(metadata) => Ok(Self::new(metadata, schema)),
            Err(RemodelError::UnrecognizedDialect(dialect)) => {
                match registry::resolve(&conn, schema)? {
                    Some(metadata) => Ok(Self::new(metadata, schema)),
                    None => Err(RemodelError::UnrecognizedDialect(dialect)),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// The translator backing this introspector
    pub fn metadata(&self) -> &Arc<dyn Metadata> {
        &self.metadata
    }

    /// The schema this introspector reads from, if pinned
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// List table names in the introspector's schema
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        self.metadata.list_tables(self.schema.as_deref()).await
    }

    /// Get columns for a table
    pub async fn get_columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        self.metadata
            .get_columns(table, self.schema.as_deref())
            .await
    }

    /// Get distinct primary-key column names for a table
    pub async fn get_primary_keys(&self, table: &str) -> Result<Vec<String>> {
        self.metadata
            .get_primary_keys(table, self.schema.as_deref())
            .await
    }

    /// Get foreign keys for a table
    pub async fn get_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyMetadata>> {
        self.metadata
            .get_foreign_keys(table, self.schema.as_deref())
            .await
    }

    /// Get indexes for a table
    pub async fn get_indexes(&self, table: &str) -> Result<Vec<IndexMetadata>> {
        self.metadata
            .get_indexes(table, self.schema.as_deref())
            .await
    }

    /// Resolve each column of a table to a portable field type
    pub async fn resolve_column_types(&self, table: &str) -> Result<ColumnTypeMap> {
        self.metadata
            .resolve_column_types(table, self.schema.as_deref())
            .await
    }
}

impl std::fmt::Debug for Introspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Introspector")
            .field("schema", &self.schema)
            .finish()
    }
}

/// Built-in dialect detection.
///
/// The toolkit ships no built-in translators, so every introspectable
/// connection reports `UnrecognizedDialect` here and resolution continues
/// through the registry. Connections without introspection support fail
/// with `Unsupported` instead, which nothing intercepts.
fn builtin_metadata(conn: &Arc<dyn Connection>) -> Result<Arc<dyn Metadata>> {
    if conn.as_schema_introspection().is_none() {
        return Err(RemodelError::Unsupported(format!(
            "{} connections do not expose schema introspection",
            conn.driver_name()
        )));
    }
    let dialect = conn.dialect_id().unwrap_or("unknown").to_string();
    tracing::debug!(dialect = %dialect, "no built-in metadata translator for dialect");
    Err(RemodelError::UnrecognizedDialect(dialect))
}
