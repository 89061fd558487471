use serde::{Deserialize, Serialize};
use std::fmt;

/// Definition of an enum-typed property: its name and ordered variant labels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub labels: Vec<String>,
}

impl EnumType {
    pub fn new<S: Into<String>>(name: impl Into<String>, labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of a label, which is also its ordinal
    pub fn ordinal_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn label_at(&self, ordinal: usize) -> Option<&str> {
        self.labels.get(ordinal).map(String::as_str)
    }
}

/// Stable identifier for the runtime type of a mapped property.
///
/// Registries are keyed by this tag, so no runtime type inspection is needed
/// to find a converter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKey {
    Bool,
    Int32,
    Int64,
    Float64,
    Decimal,
    Text,
    Bytes,
    Timestamp,
    Uuid,
    Json,
    Enum(EnumType),
    Custom(String),
}

impl TypeKey {
    pub fn is_enum(&self) -> bool {
        matches!(self, TypeKey::Enum(_))
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            TypeKey::Enum(def) => Some(def),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeKey::Bool => "bool",
            TypeKey::Int32 => "int32",
            TypeKey::Int64 => "int64",
            TypeKey::Float64 => "float64",
            TypeKey::Decimal => "decimal",
            TypeKey::Text => "text",
            TypeKey::Bytes => "bytes",
            TypeKey::Timestamp => "timestamp",
            TypeKey::Uuid => "uuid",
            TypeKey::Json => "json",
            TypeKey::Enum(def) => &def.name,
            TypeKey::Custom(name) => name,
        }
    }

    /// Parse a scalar type name. Enum keys carry labels and can't be built from a name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bool" | "boolean" => Some(TypeKey::Bool),
            "int" | "int32" | "integer" => Some(TypeKey::Int32),
            "long" | "int64" | "bigint" => Some(TypeKey::Int64),
            "double" | "float64" => Some(TypeKey::Float64),
            "decimal" | "numeric" => Some(TypeKey::Decimal),
            "text" | "string" | "varchar" => Some(TypeKey::Text),
            "bytes" | "blob" | "bytea" => Some(TypeKey::Bytes),
            "timestamp" | "datetime" => Some(TypeKey::Timestamp),
            "uuid" => Some(TypeKey::Uuid),
            "json" | "jsonb" => Some(TypeKey::Json),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Enum(def) => write!(f, "enum {}", def.name),
            other => f.write_str(other.name()),
        }
    }
}

/// SQL type hint carried by a column, independent of the property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Boolean,
    Integer,
    BigInt,
    Double,
    Decimal,
    Varchar,
    Clob,
    Blob,
    Timestamp,
    Other,
}

impl SqlType {
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE",
            SqlType::Decimal => "DECIMAL",
            SqlType::Varchar => "VARCHAR",
            SqlType::Clob => "CLOB",
            SqlType::Blob => "BLOB",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Other => "OTHER",
        }
    }
}
