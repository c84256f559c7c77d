//! SQL Server driver and reflection registration

use crate::connection::MssqlDatabase;
use crate::metadata::MssqlMetadata;
use async_trait::async_trait;
use remodel_core::{
    Connection, ConnectionConfig, DatabaseDriver, DriverCapabilities, RemodelError, Result,
};
use remodel_reflect::{Metadata, MetadataResolver, register_resolver};
use std::sync::Arc;

/// SQL Server database driver
pub struct MssqlDriver;

impl MssqlDriver {
    /// Create a new SQL Server driver instance
    pub fn new() -> Self {
        tracing::debug!("SQL Server driver initialized");
        Self
    }
}

impl Default for MssqlDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for MssqlDriver {
    fn id(&self) -> &'static str {
        "mssql"
    }

    fn name(&self) -> &'static str {
        "mssql"
    }

    fn display_name(&self) -> &'static str {
        "SQL Server"
    }

    fn default_port(&self) -> Option<u16> {
        Some(1433)
    }

    fn capabilities(&self) -> DriverCapabilities {
        DriverCapabilities {
            supports_upsert: false,
            supports_sequences: false,
            supports_date_functions: false,
            supports_schemas: true,
            supports_foreign_keys: true,
            max_identifier_length: Some(128),
            max_parameters: Some(2100), // SQL Server limit
        }
    }

    #[tracing::instrument(skip(self, config), fields(host = config.get_string("host").as_deref(), database = config.get_string("database").as_deref()))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        tracing::debug!("connecting to SQL Server");
        let database = MssqlDatabase::from_config(config)
            .await
            .map_err(|e| RemodelError::Connection(e.to_string()))?;
        Ok(Arc::new(database))
    }

    #[tracing::instrument(skip(self, config))]
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<()> {
        tracing::debug!("testing SQL Server connection");
        let _conn = self.connect(config).await?;
        Ok(())
    }

    fn build_connection_string(&self, config: &ConnectionConfig) -> String {
        let host = config
            .get_string("host")
            .unwrap_or_else(|| "localhost".to_string());
        let port = if config.port > 0 { config.port } else { 1433 };
        let database = config.get_string("database");
        let user = config
            .get_string("user")
            .or_else(|| config.get_string("username"));

        let mut conn_str = format!("Server={},{}", host, port);

        if let Some(db) = database {
            conn_str.push_str(&format!(";Database={}", db));
        }

        if let Some(u) = user {
            conn_str.push_str(&format!(";User Id={}", u));
            if let Some(p) = config.get_string("password") {
                conn_str.push_str(&format!(";Password={}", p));
            }
        } else {
            conn_str.push_str(";Trusted_Connection=True");
        }

        conn_str
    }
}

/// Hook the SQL Server metadata translator into the reflection registry.
///
/// Call once at host initialization. The introspector factory falls back to
/// this resolver only when built-in dialect detection fails with
/// `UnrecognizedDialect`; a repeated registration is a no-op.
pub fn register_metadata() {
    register_resolver(MetadataResolver {
        name: "mssql",
        matches: is_mssql_connection,
        build: build_mssql_metadata,
    });
}

fn is_mssql_connection(conn: &dyn Connection) -> bool {
    conn.dialect_id() == Some("mssql")
}

fn build_mssql_metadata(
    conn: Arc<dyn Connection>,
    schema: Option<&str>,
) -> Result<Arc<dyn Metadata>> {
    Ok(Arc::new(MssqlMetadata::new(conn, schema)))
}
