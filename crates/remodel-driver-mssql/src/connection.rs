//! SQL Server connection plumbing over tiberius

use crate::catalog::CatalogCache;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use remodel_core::{
    ColumnMeta, Connection, ConnectionConfig, QueryResult, RemodelError, Result, Row,
    SchemaIntrospection, Value,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tiberius::{AuthMethod, Client, ColumnData, Config, EncryptionLevel, Row as TiberiusRow};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// SQL Server adapter errors
#[derive(Debug, thiserror::Error)]
pub enum MssqlDatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Type conversion error: {0}")]
    TypeConversion(String),

    #[error("Connection is closed")]
    ConnectionClosed,

    #[error("Tiberius error: {0}")]
    Tiberius(#[from] tiberius::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MssqlDatabaseError> for RemodelError {
    fn from(err: MssqlDatabaseError) -> Self {
        RemodelError::Driver(err.to_string())
    }
}

/// Schema used when the configuration names none.
pub(crate) const DEFAULT_SCHEMA: &str = "dbo";

/// A live SQL Server database: one tiberius client, the default schema
/// resolved at construction, and the catalog metadata cache.
///
/// The adapter owns exactly one connection for its lifetime. Operations are
/// sequential round-trips; the client mutex serializes them without any
/// queueing or retry on top.
pub struct MssqlDatabase {
    client: Mutex<Client<Compat<TcpStream>>>,
    closed: AtomicBool,
    database: Option<String>,
    default_schema: String,
    pub(crate) catalog: CatalogCache,
}

impl MssqlDatabase {
    /// Open a connection to a SQL Server instance.
    ///
    /// # Arguments
    /// * `host` - Server hostname
    /// * `port` - Server port (conventionally 1433)
    /// * `database` - Database name (optional)
    /// * `username` - Username for SQL Server authentication
    /// * `password` - Password
    /// * `trust_cert` - Trust the server certificate (for dev/testing)
    /// * `default_schema` - Schema used when introspection callers pass
    ///   none; defaults to "dbo"
    #[tracing::instrument(skip(password))]
    pub async fn connect(
        host: &str,
        port: u16,
        database: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
        trust_cert: bool,
        default_schema: Option<&str>,
    ) -> std::result::Result<Self, MssqlDatabaseError> {
        tracing::debug!("connecting to SQL Server at {}:{}", host, port);

        let mut config = Config::new();
        config.host(host);
        config.port(port);

        if let Some(db) = database {
            config.database(db);
        }

        if trust_cert {
            config.trust_cert();
        }

        config.encryption(EncryptionLevel::Required);

        match (username, password) {
            (Some(user), Some(pass)) => {
                config.authentication(AuthMethod::sql_server(user, pass));
            }
            (Some(user), None) => {
                config.authentication(AuthMethod::sql_server(user, ""));
            }
            (None, _) => {
                return Err(MssqlDatabaseError::AuthenticationFailed(
                    "SQL Server authentication requires a username".to_string(),
                ));
            }
        }

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| MssqlDatabaseError::ConnectionFailed(e.to_string()))?;
        tcp.set_nodelay(true)?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| MssqlDatabaseError::ConnectionFailed(e.to_string()))?;

        tracing::debug!("connected to SQL Server");

        Ok(Self {
            client: Mutex::new(client),
            closed: AtomicBool::new(false),
            database: database.map(String::from),
            default_schema: default_schema.unwrap_or(DEFAULT_SCHEMA).to_string(),
            catalog: CatalogCache::new(),
        })
    }

    /// Create an adapter from a connection configuration.
    ///
    /// Reads `trust_cert` and `schema` from the parameter map; the port
    /// defaults to 1433.
    pub async fn from_config(
        config: &ConnectionConfig,
    ) -> std::result::Result<Self, MssqlDatabaseError> {
        let host = config
            .get_string("host")
            .unwrap_or_else(|| "localhost".to_string());
        let port = if config.port > 0 { config.port } else { 1433 };
        let database = config.get_string("database");
        let username = config
            .get_string("user")
            .or_else(|| config.get_string("username"));
        let password = config.get_string("password");
        let trust_cert = config
            .params
            .get("trust_cert")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let default_schema = config.params.get("schema").cloned();

        Self::connect(
            &host,
            port,
            database.as_deref(),
            username.as_deref(),
            password.as_deref(),
            trust_cert,
            default_schema.as_deref(),
        )
        .await
    }

    /// Schema used when introspection callers pass none
    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    /// Resolve an absent or empty schema argument to this adapter's default
    pub(crate) fn resolve_schema<'a>(&'a self, schema: Option<&'a str>) -> &'a str {
        match schema {
            Some(s) if !s.is_empty() => s,
            _ => &self.default_schema,
        }
    }

    fn ensure_open(&self) -> std::result::Result<(), MssqlDatabaseError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MssqlDatabaseError::ConnectionClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl Connection for MssqlDatabase {
    fn driver_name(&self) -> &str {
        "mssql"
    }

    fn dialect_id(&self) -> Option<&'static str> {
        Some("mssql")
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.ensure_open()?;
        // Logged before binding: the text shows placeholders, not bound values.
        tracing::debug!(sql = %sql, "execute");

        let mut client = self.client.lock().await;
        let tiberius_params = values_to_tiberius_params(params)?;
        let param_refs: Vec<&dyn tiberius::ToSql> = tiberius_params
            .iter()
            .map(|p| p.as_ref() as &dyn tiberius::ToSql)
            .collect();

        let result = client
            .execute(sql, &param_refs[..])
            .await
            .map_err(|e| RemodelError::Query(e.to_string()))?;
        Ok(result.rows_affected().iter().sum::<u64>())
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.ensure_open()?;
        tracing::debug!(sql = %sql, "query");
        let start = std::time::Instant::now();

        let mut client = self.client.lock().await;
        let tiberius_params = values_to_tiberius_params(params)?;
        let param_refs: Vec<&dyn tiberius::ToSql> = tiberius_params
            .iter()
            .map(|p| p.as_ref() as &dyn tiberius::ToSql)
            .collect();

        let stream = client
            .query(sql, &param_refs[..])
            .await
            .map_err(|e| RemodelError::Query(e.to_string()))?;
        let tib_rows = stream
            .into_first_result()
            .await
            .map_err(|e| RemodelError::Query(e.to_string()))?;

        let mut columns: Vec<ColumnMeta> = Vec::new();
        if let Some(first_row) = tib_rows.first() {
            columns = first_row
                .columns()
                .iter()
                .enumerate()
                .map(|(idx, col)| ColumnMeta {
                    name: col.name().to_string(),
                    data_type: format!("{:?}", col.column_type()),
                    nullable: true,
                    ordinal: idx,
                })
                .collect();
        }

        let column_names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let mut rows: Vec<Row> = Vec::with_capacity(tib_rows.len());
        for tib_row in tib_rows {
            rows.push(Row::new(column_names.clone(), tiberius_row_to_values(tib_row)?));
        }

        let execution_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            row_count = rows.len(),
            duration_ms = execution_time_ms,
            "query completed"
        );

        Ok(QueryResult {
            columns,
            rows,
            affected_rows: 0,
            execution_time_ms,
        })
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        tracing::debug!("SQL Server connection closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

impl std::fmt::Debug for MssqlDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlDatabase")
            .field("database", &self.database)
            .field("default_schema", &self.default_schema)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

fn tds_base_1900() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
}

fn tds_base_0001() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap()
}

fn days_from(base: NaiveDate, days: i64) -> NaiveDate {
    base + chrono::Duration::days(days)
}

fn seconds_time(secs: u32, nanos: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or_default()
}

fn datetime2_to_naive(dt: tiberius::time::DateTime2) -> NaiveDateTime {
    let time = dt.time();
    NaiveDateTime::new(
        days_from(tds_base_0001(), dt.date().days() as i64),
        seconds_time(
            (time.increments() / 10_000_000) as u32,
            ((time.increments() % 10_000_000) * 100) as u32,
        ),
    )
}

/// Convert a tiberius row to values by consuming the row
fn tiberius_row_to_values(row: TiberiusRow) -> Result<Vec<Value>> {
    row.into_iter().map(column_data_to_value).collect()
}

/// Convert tiberius ColumnData to a remodel Value
pub(crate) fn column_data_to_value(data: ColumnData<'static>) -> Result<Value> {
    let value = match data {
        ColumnData::Bit(v) => v.map(Value::Bool),
        ColumnData::U8(v) => v.map(|n| Value::Int16(i16::from(n))),
        ColumnData::I16(v) => v.map(Value::Int16),
        ColumnData::I32(v) => v.map(Value::Int32),
        ColumnData::I64(v) => v.map(Value::Int64),
        ColumnData::F32(v) => v.map(Value::Float32),
        ColumnData::F64(v) => v.map(Value::Float64),
        ColumnData::String(v) => v.map(|s| Value::String(s.into_owned())),
        ColumnData::Guid(v) => v.map(Value::Uuid),
        ColumnData::Binary(v) => v.map(|b| Value::Bytes(b.into_owned())),
        ColumnData::Numeric(v) => v.map(|n| Value::Decimal(n.to_string())),
        ColumnData::Xml(v) => v.map(|x| Value::String(x.into_owned().into_string())),
        ColumnData::DateTime(v) => v.map(|dt| {
            Value::DateTime(NaiveDateTime::new(
                days_from(tds_base_1900(), dt.days() as i64),
                seconds_time((dt.seconds_fragments() as f64 / 300.0) as u32, 0),
            ))
        }),
        ColumnData::SmallDateTime(v) => v.map(|dt| {
            // seconds_fragments counts minutes for smalldatetime
            Value::DateTime(NaiveDateTime::new(
                days_from(tds_base_1900(), dt.days() as i64),
                seconds_time(u32::from(dt.seconds_fragments()) * 60, 0),
            ))
        }),
        ColumnData::DateTime2(v) => v.map(|dt| Value::DateTime(datetime2_to_naive(dt))),
        ColumnData::DateTimeOffset(v) => v.map(|dto| {
            let naive = datetime2_to_naive(dto.datetime2());
            Value::DateTimeUtc(chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(
                naive,
                chrono::Utc,
            ))
        }),
        ColumnData::Date(v) => v.map(|d| Value::Date(days_from(tds_base_0001(), d.days() as i64))),
        ColumnData::Time(v) => v.map(|t| {
            Value::Time(seconds_time(
                (t.increments() / 10_000_000) as u32,
                ((t.increments() % 10_000_000) * 100) as u32,
            ))
        }),
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Container for tiberius parameter values
#[derive(Debug)]
pub(crate) enum TiberiusParam {
    Null,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Uuid(uuid::Uuid),
}

impl tiberius::ToSql for TiberiusParam {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            TiberiusParam::Null => ColumnData::I32(None),
            TiberiusParam::Bool(v) => ColumnData::Bit(Some(*v)),
            TiberiusParam::I16(v) => ColumnData::I16(Some(*v)),
            TiberiusParam::I32(v) => ColumnData::I32(Some(*v)),
            TiberiusParam::I64(v) => ColumnData::I64(Some(*v)),
            TiberiusParam::F32(v) => ColumnData::F32(Some(*v)),
            TiberiusParam::F64(v) => ColumnData::F64(Some(*v)),
            TiberiusParam::String(v) => {
                ColumnData::String(Some(std::borrow::Cow::Borrowed(v.as_str())))
            }
            TiberiusParam::Bytes(v) => {
                ColumnData::Binary(Some(std::borrow::Cow::Borrowed(v.as_slice())))
            }
            TiberiusParam::Uuid(v) => ColumnData::Guid(Some(*v)),
        }
    }
}

/// Convert remodel Values to tiberius parameters (`@PN` placeholder style)
pub(crate) fn values_to_tiberius_params(values: &[Value]) -> Result<Vec<Box<TiberiusParam>>> {
    values
        .iter()
        .map(|v| {
            let param = match v {
                Value::Null => TiberiusParam::Null,
                Value::Bool(b) => TiberiusParam::Bool(*b),
                Value::Int16(i) => TiberiusParam::I16(*i),
                Value::Int32(i) => TiberiusParam::I32(*i),
                Value::Int64(i) => TiberiusParam::I64(*i),
                Value::Float32(f) => TiberiusParam::F32(*f),
                Value::Float64(f) => TiberiusParam::F64(*f),
                Value::Decimal(d) => TiberiusParam::String(d.clone()),
                Value::String(s) => TiberiusParam::String(s.clone()),
                Value::Bytes(b) => TiberiusParam::Bytes(b.clone()),
                Value::Uuid(u) => TiberiusParam::Uuid(*u),
                Value::Date(d) => TiberiusParam::String(d.to_string()),
                Value::Time(t) => TiberiusParam::String(t.to_string()),
                Value::DateTime(dt) => TiberiusParam::String(dt.to_string()),
                Value::DateTimeUtc(dt) => TiberiusParam::String(dt.to_string()),
            };
            Ok(Box::new(param))
        })
        .collect()
}
