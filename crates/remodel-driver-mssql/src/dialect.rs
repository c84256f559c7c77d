//! T-SQL dialect implementation
//!
//! SQL syntax construction for SQL Server: identifier quoting, pagination,
//! and the DDL spelling of each portable field kind. The conflict-resolution
//! and date-arithmetic builders are intentionally unsupported on this
//! adapter and fail loudly rather than emit wrong SQL.

use remodel_core::{FieldType, RemodelError, Result, SqlDialect};

/// T-SQL dialect for SQL Server
///
/// # Example
///
/// ```
/// use remodel_core::SqlDialect;
/// use remodel_driver_mssql::MssqlDialect;
///
/// let dialect = MssqlDialect::new();
/// assert_eq!(dialect.quote_identifier("orders"), "[orders]");
/// assert_eq!(dialect.limit_clause(10, None), "TOP 10");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new T-SQL dialect instance
    pub fn new() -> Self {
        Self
    }
}

fn unsupported(what: &str) -> RemodelError {
    RemodelError::Unsupported(format!("{what} is not implemented for the mssql dialect"))
}

impl SqlDialect for MssqlDialect {
    fn id(&self) -> &'static str {
        "mssql"
    }

    /// Square-bracket quoting; closing brackets are doubled
    fn quote_identifier(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    /// Single-quote literals; embedded quotes are doubled
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// `TOP n` without an offset, `OFFSET ... FETCH` (2012+) with one.
    /// The OFFSET form requires an ORDER BY in the enclosing query.
    fn limit_clause(&self, limit: u64, offset: Option<u64>) -> String {
        match offset {
            Some(off) if off > 0 => {
                format!("OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", off, limit)
            }
            _ => format!("TOP {}", limit),
        }
    }

    fn field_ddl(&self, field: FieldType) -> Option<&'static str> {
        match field {
            FieldType::Bool => Some("tinyint"),
            FieldType::Int => Some("int"),
            FieldType::Float => Some("float"),
            FieldType::Double => Some("float(53)"),
            FieldType::Decimal => Some("decimal"),
            FieldType::Char => Some("nchar"),
            FieldType::VarChar => Some("nvarchar"),
            FieldType::Text => Some("nvarchar(max)"),
            FieldType::Blob => Some("varbinary"),
            FieldType::Uuid => Some("nchar(40)"),
            FieldType::Date => Some("date"),
            FieldType::Time => Some("time"),
            FieldType::DateTime => Some("datetime2"),
            FieldType::AutoIncrement => Some("int identity"),
        }
    }

    fn build_upsert_clause(
        &self,
        _table: &str,
        _columns: &[&str],
        _conflict_target: &[&str],
    ) -> Result<String> {
        Err(unsupported("conflict resolution"))
    }

    fn extract_date_part(&self, _part: &str, _expr: &str) -> Result<String> {
        Err(unsupported("date part extraction"))
    }

    fn truncate_date(&self, _part: &str, _expr: &str) -> Result<String> {
        Err(unsupported("date truncation"))
    }

    fn to_timestamp(&self, _expr: &str) -> Result<String> {
        Err(unsupported("timestamp conversion"))
    }

    fn from_timestamp(&self, _expr: &str) -> Result<String> {
        Err(unsupported("timestamp conversion"))
    }
}
