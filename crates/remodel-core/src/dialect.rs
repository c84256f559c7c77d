//! Dialect SQL construction and driver capabilities

use crate::{FieldType, Result};

/// Capabilities a driver may support.
///
/// The host checks these before calling the corresponding `SqlDialect`
/// operations; an unsupported operation called anyway fails with
/// `RemodelError::Unsupported`.
#[derive(Debug, Clone, Default)]
pub struct DriverCapabilities {
    /// Supports UPSERT/conflict-resolution clause generation
    pub supports_upsert: bool,
    /// Supports sequence introspection
    pub supports_sequences: bool,
    /// Supports date arithmetic/truncation clause generation
    pub supports_date_functions: bool,
    /// Supports schemas (namespaces)
    pub supports_schemas: bool,
    /// Supports foreign keys
    pub supports_foreign_keys: bool,
    /// Maximum identifier length (None = no limit)
    pub max_identifier_length: Option<usize>,
    /// Maximum parameters per query (None = no limit)
    pub max_parameters: Option<usize>,
}

/// SQL syntax construction for one dialect.
///
/// The clause builders return SQL fragments the host splices into generated
/// statements. Dialects that cannot express a clause fail loudly instead of
/// producing wrong SQL.
pub trait SqlDialect: Send + Sync {
    /// Dialect identifier (matches `Connection::dialect_id`)
    fn id(&self) -> &'static str;

    /// Quote an identifier
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal
    fn quote_string(&self, s: &str) -> String;

    /// Render a row-limiting clause
    fn limit_clause(&self, limit: u64, offset: Option<u64>) -> String;

    /// Engine DDL spelling of a portable field kind, if overridden
    fn field_ddl(&self, field: FieldType) -> Option<&'static str> {
        let _ = field;
        None
    }

    /// Render an upsert/conflict-resolution clause
    fn build_upsert_clause(
        &self,
        table: &str,
        columns: &[&str],
        conflict_target: &[&str],
    ) -> Result<String>;

    /// Render extraction of a date part (year, month, ...) from an expression
    fn extract_date_part(&self, part: &str, expr: &str) -> Result<String>;

    /// Render truncation of an expression down to a date part
    fn truncate_date(&self, part: &str, expr: &str) -> Result<String>;

    /// Render conversion of a date expression to a unix timestamp
    fn to_timestamp(&self, expr: &str) -> Result<String>;

    /// Render conversion of a unix timestamp back to a date expression
    fn from_timestamp(&self, expr: &str) -> Result<String>;
}
