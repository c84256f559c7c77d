//! Raw catalog rows, the per-table metadata cache, and the projections the
//! public accessors share.

use remodel_core::{ColumnMetadata, ForeignKeyMetadata, IndexMetadata, QueryResult, Result, Row, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The one composite catalog query behind every metadata accessor.
///
/// INFORMATION_SCHEMA exposes no direct column-to-referenced-column view,
/// so the referenced side of a foreign key is reconstructed through the
/// second TABLE_CONSTRAINTS / CONSTRAINT_COLUMN_USAGE pair. The descending
/// constraint-name ordering keeps rows of one constraint grouped, with
/// unconstrained rows last (the engine sorts NULLs last on DESC); downstream
/// filters rely on that grouping.
pub(crate) const RAW_METADATA_SQL: &str = r#"
SELECT
    C.COLUMN_NAME,
    C.COLUMN_DEFAULT,
    C.IS_NULLABLE,
    C.DATA_TYPE,
    C.CHARACTER_MAXIMUM_LENGTH,
    F.UNIQUE_CONSTRAINT_NAME,
    PP.TABLE_NAME,
    PP.COLUMN_NAME,
    T.CONSTRAINT_TYPE
FROM INFORMATION_SCHEMA.COLUMNS C
LEFT JOIN INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE U
    ON U.COLUMN_NAME = C.COLUMN_NAME AND U.TABLE_NAME = C.TABLE_NAME
LEFT JOIN INFORMATION_SCHEMA.TABLE_CONSTRAINTS T
    ON T.CONSTRAINT_NAME = U.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS F
    ON T.CONSTRAINT_NAME = F.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.TABLE_CONSTRAINTS P
    ON F.UNIQUE_CONSTRAINT_NAME = P.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE PP
    ON P.CONSTRAINT_NAME = PP.CONSTRAINT_NAME
WHERE C.TABLE_NAME = @P1 AND C.TABLE_SCHEMA = @P2
ORDER BY U.CONSTRAINT_NAME DESC"#;

/// Constraint kinds INFORMATION_SCHEMA.TABLE_CONSTRAINTS reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
}

impl ConstraintKind {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PRIMARY KEY" => Some(Self::PrimaryKey),
            "FOREIGN KEY" => Some(Self::ForeignKey),
            "UNIQUE" => Some(Self::Unique),
            "CHECK" => Some(Self::Check),
            _ => None,
        }
    }
}

/// One row of the composite catalog join: a column definition paired with
/// at most one constraint it participates in. Unconstrained columns appear
/// once with `constraint: None`; a column under several constraints appears
/// once per constraint.
#[derive(Debug, Clone)]
pub(crate) struct ConstraintRow {
    pub column: String,
    pub default: Option<String>,
    pub nullable: bool,
    pub data_type: String,
    pub max_length: Option<i64>,
    /// Name of the referential constraint, for FOREIGN KEY rows
    pub referential_constraint: Option<String>,
    /// Table the foreign key points at
    pub referenced_table: Option<String>,
    /// Column the foreign key points at
    pub referenced_column: Option<String>,
    pub constraint: Option<ConstraintKind>,
}

/// Decode the composite query's result. Column order follows the SELECT list.
pub(crate) fn parse_constraint_rows(result: &QueryResult) -> Vec<ConstraintRow> {
    result
        .rows
        .iter()
        .map(|row| ConstraintRow {
            column: string_at(row, 0),
            default: opt_string_at(row, 1),
            nullable: opt_string_at(row, 2).as_deref() == Some("YES"),
            data_type: string_at(row, 3),
            max_length: row.get(4).and_then(Value::as_i64),
            referential_constraint: opt_string_at(row, 5),
            referenced_table: opt_string_at(row, 6),
            referenced_column: opt_string_at(row, 7),
            constraint: opt_string_at(row, 8)
                .as_deref()
                .and_then(ConstraintKind::parse),
        })
        .collect()
}

fn string_at(row: &Row, idx: usize) -> String {
    row.get(idx).and_then(Value::as_str).unwrap_or("").to_string()
}

fn opt_string_at(row: &Row, idx: usize) -> Option<String> {
    row.get(idx).and_then(Value::as_str).map(str::to_string)
}

/// Project column records out of the raw rows.
///
/// `primary_key` reflects each row's own constraint, so a column under
/// several constraints repeats and its flag may differ between entries.
/// That is the row-per-constraint representation, kept as-is.
pub(crate) fn columns_from(rows: &[ConstraintRow], table: &str) -> Vec<ColumnMetadata> {
    rows.iter()
        .map(|row| ColumnMetadata {
            name: row.column.clone(),
            data_type: row.data_type.clone(),
            nullable: row.nullable,
            primary_key: row.constraint == Some(ConstraintKind::PrimaryKey),
            table: table.to_string(),
            default: row.default.clone(),
        })
        .collect()
}

/// Distinct primary-key column names, in first-seen order
pub(crate) fn primary_keys_from(rows: &[ConstraintRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows
        .iter()
        .filter(|r| r.constraint == Some(ConstraintKind::PrimaryKey))
    {
        if !names.iter().any(|name| name == &row.column) {
            names.push(row.column.clone());
        }
    }
    names
}

pub(crate) fn foreign_keys_from(rows: &[ConstraintRow], table: &str) -> Vec<ForeignKeyMetadata> {
    rows.iter()
        .filter(|r| r.constraint == Some(ConstraintKind::ForeignKey))
        .map(|row| ForeignKeyMetadata {
            column: row.column.clone(),
            dest_table: row.referenced_table.clone().unwrap_or_default(),
            dest_column: row.referenced_column.clone().unwrap_or_default(),
            table: table.to_string(),
        })
        .collect()
}

/// UNIQUE and PRIMARY KEY constraints surfaced as unique single-column
/// indexes. The engine's real index catalog is not consulted on this path,
/// so the definition text is empty and the index is named after its column;
/// true secondary indexes are not discoverable here.
pub(crate) fn indexes_from(rows: &[ConstraintRow], table: &str) -> Vec<IndexMetadata> {
    rows.iter()
        .filter(|r| {
            matches!(
                r.constraint,
                Some(ConstraintKind::Unique | ConstraintKind::PrimaryKey)
            )
        })
        .map(|row| IndexMetadata {
            name: row.column.clone(),
            sql: String::new(),
            column: row.column.clone(),
            unique: true,
            table: table.to_string(),
        })
        .collect()
}

/// Lazily-populated (schema, table) -> raw row cache.
///
/// Entries live for the adapter's lifetime and are never invalidated; a
/// caller that needs fresh metadata opens a new adapter. The lock is not
/// held across the fetch, so two tasks missing the same key may both run
/// the catalog query; the idempotent result makes that harmless and the
/// second insert wins.
pub(crate) struct CatalogCache {
    entries: Mutex<HashMap<(String, String), Arc<Vec<ConstraintRow>>>>,
}

impl CatalogCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached rows for (schema, table), awaiting `fetch` on a
    /// miss. On a hit the fetch future is dropped unpolled, so no query runs.
    pub(crate) async fn get_or_fetch<Fut>(
        &self,
        schema: &str,
        table: &str,
        fetch: Fut,
    ) -> Result<Arc<Vec<ConstraintRow>>>
    where
        Fut: Future<Output = Result<Vec<ConstraintRow>>>,
    {
        let key = (schema.to_string(), table.to_string());
        if let Some(rows) = self.entries.lock().await.get(&key).cloned() {
            return Ok(rows);
        }
        let rows = Arc::new(fetch.await?);
        self.entries.lock().await.insert(key, rows.clone());
        Ok(rows)
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
