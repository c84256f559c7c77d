//! SQL Server metadata translator: native column types to portable field kinds

use crate::connection::DEFAULT_SCHEMA;
use async_trait::async_trait;
use remodel_core::{ColumnTypeMap, Connection, FieldType, RemodelError, Result};
use remodel_reflect::Metadata;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed map from the engine's lowercase type names to portable field kinds.
///
/// Lookups are exact. A type missing here is a hard error so schema drift
/// surfaces instead of decaying into a guessed string kind.
pub(crate) fn column_field_type(data_type: &str) -> Option<FieldType> {
    match data_type {
        "int" | "tinyint" => Some(FieldType::Int),
        "char" | "nchar" => Some(FieldType::Char),
        "varchar" | "nvarchar" => Some(FieldType::VarChar),
        "text" => Some(FieldType::Text),
        "date" => Some(FieldType::Date),
        "float" => Some(FieldType::Float),
        "varbinary" => Some(FieldType::Blob),
        "datetime" | "datetime2" => Some(FieldType::DateTime),
        "time" => Some(FieldType::Time),
        "decimal" => Some(FieldType::Decimal),
        _ => None,
    }
}

/// The dialect metadata translator: binds a SQL Server connection to the
/// generic reflection contract.
pub struct MssqlMetadata {
    connection: Arc<dyn Connection>,
    default_schema: String,
}

impl MssqlMetadata {
    /// Bind to a connection, using the provided schema or the dialect default
    pub fn new(connection: Arc<dyn Connection>, schema: Option<&str>) -> Self {
        let default_schema = match schema {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_SCHEMA.to_string(),
        };
        Self {
            connection,
            default_schema,
        }
    }
}

#[async_trait]
impl Metadata for MssqlMetadata {
    fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    fn default_schema(&self) -> Option<&str> {
        Some(&self.default_schema)
    }

    async fn resolve_column_types(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<ColumnTypeMap> {
        let schema = match schema {
            Some(s) if !s.is_empty() => s,
            _ => self.default_schema.as_str(),
        };
        tracing::debug!(schema = %schema, table = %table, "resolving column types");

        let columns = self.get_columns(table, Some(schema)).await?;
        let mut types = HashMap::new();
        for column in &columns {
            let field = column_field_type(&column.data_type).ok_or_else(|| {
                RemodelError::UnknownColumnType {
                    column: column.name.clone(),
                    data_type: column.data_type.clone(),
                }
            })?;
            types.insert(column.name.clone(), field);
        }
        // The second map carries per-column extension attributes; this
        // engine populates none.
        Ok((types, HashMap::new()))
    }
}

impl std::fmt::Debug for MssqlMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlMetadata")
            .field("default_schema", &self.default_schema)
            .finish()
    }
}
