//! Portable field-type vocabulary

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The portable field kinds a dialect's native column types resolve to.
///
/// These are the shapes the reflection front end knows how to turn into
/// model fields; everything engine-specific stays behind the dialect's
/// type map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Small-integer-backed boolean
    Bool,
    /// Integer
    Int,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Exact decimal
    Decimal,
    /// Fixed-length string
    Char,
    /// Variable-length string
    VarChar,
    /// Unbounded text
    Text,
    /// Binary blob
    Blob,
    /// UUID stored in an engine-appropriate column
    Uuid,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time
    DateTime,
    /// Auto-incrementing surrogate key
    AutoIncrement,
}

impl FieldType {
    /// Stable lowercase name, as used in generated model sources.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Decimal => "decimal",
            FieldType::Char => "char",
            FieldType::VarChar => "varchar",
            FieldType::Text => "text",
            FieldType::Blob => "blob",
            FieldType::Uuid => "uuid",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::AutoIncrement => "auto_increment",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved column types for one table: column name to portable field kind,
/// plus a reserved map of per-column extension attributes for engines that
/// report extra information (empty when the engine has none).
pub type ColumnTypeMap = (
    HashMap<String, FieldType>,
    HashMap<String, HashMap<String, String>>,
);
