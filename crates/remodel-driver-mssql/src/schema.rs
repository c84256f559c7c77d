//! Catalog introspection for SQL Server

use crate::catalog::{self, ConstraintRow, RAW_METADATA_SQL};
use crate::connection::MssqlDatabase;
use async_trait::async_trait;
use remodel_core::{
    ColumnMetadata, Connection, ForeignKeyMetadata, IndexMetadata, RemodelError, Result,
    SchemaIntrospection, Value,
};
use std::sync::Arc;

impl MssqlDatabase {
    /// The cache-or-query primitive every metadata accessor goes through.
    ///
    /// All four accessors for a (schema, table) slice the same cached row
    /// sequence; once the entry is warm no further catalog queries run.
    async fn constraint_rows(&self, table: &str, schema: &str) -> Result<Arc<Vec<ConstraintRow>>> {
        self.catalog
            .get_or_fetch(schema, table, async {
                tracing::debug!(schema = %schema, table = %table, "fetching catalog metadata");
                let result = self
                    .query(
                        RAW_METADATA_SQL,
                        &[
                            Value::String(table.to_string()),
                            Value::String(schema.to_string()),
                        ],
                    )
                    .await?;
                Ok(catalog::parse_constraint_rows(&result))
            })
            .await
    }
}

#[async_trait]
impl SchemaIntrospection for MssqlDatabase {
    #[tracing::instrument(skip(self))]
    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<String>> {
        let schema = self.resolve_schema(schema);
        let result = self
            .query(
                "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = @P1 ORDER BY TABLE_NAME",
                &[Value::String(schema.to_string())],
            )
            .await?;
        Ok(result
            .rows
            .iter()
            .filter_map(|row| row.get(0).and_then(Value::as_str).map(str::to_string))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_columns(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnMetadata>> {
        let schema = self.resolve_schema(schema);
        let rows = self.constraint_rows(table, schema).await?;
        Ok(catalog::columns_from(&rows, table))
    }

    #[tracing::instrument(skip(self))]
    async fn get_primary_keys(&self, table: &str, schema: Option<&str>) -> Result<Vec<String>> {
        let schema = self.resolve_schema(schema);
        let rows = self.constraint_rows(table, schema).await?;
        Ok(catalog::primary_keys_from(&rows))
    }

    #[tracing::instrument(skip(self))]
    async fn get_foreign_keys(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ForeignKeyMetadata>> {
        let schema = self.resolve_schema(schema);
        let rows = self.constraint_rows(table, schema).await?;
        Ok(catalog::foreign_keys_from(&rows, table))
    }

    #[tracing::instrument(skip(self))]
    async fn get_indexes(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<IndexMetadata>> {
        let schema = self.resolve_schema(schema);
        let rows = self.constraint_rows(table, schema).await?;
        Ok(catalog::indexes_from(&rows, table))
    }

    async fn list_sequences(&self, _schema: Option<&str>) -> Result<Vec<String>> {
        Err(RemodelError::Unsupported(
            "sequence introspection is not implemented for the mssql dialect".to_string(),
        ))
    }
}
