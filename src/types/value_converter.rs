use crate::types::{EnumType, Value};
use crate::{ColumnError, Result};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Translates between a raw column value and its in-memory representation.
///
/// `encode` runs on the way into the database, `decode` on the way out.
/// Implementations must be safe to share between threads; a resolved
/// converter is reused by every operation touching its column.
pub trait ValueConverter: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn encode(&self, value: &Value) -> Result<Value>;

    fn decode(&self, raw: &Value) -> Result<Value>;

    fn as_any(&self) -> &dyn Any;
}

/// Leaves values untouched in both directions
#[derive(Debug, Default)]
pub struct PassthroughConverter;

impl ValueConverter for PassthroughConverter {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn encode(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn decode(&self, raw: &Value) -> Result<Value> {
        Ok(raw.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stores enum properties as their variant label
#[derive(Debug)]
pub struct EnumNameConverter {
    def: EnumType,
}

impl EnumNameConverter {
    pub fn new(def: EnumType) -> Self {
        Self { def }
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.def
    }

    fn check_label(&self, label: &str) -> Result<()> {
        if self.def.ordinal_of(label).is_some() {
            Ok(())
        } else {
            Err(ColumnError::conversion(
                self.name(),
                format!("'{}' is not a variant of {}", label, self.def.name),
            ))
        }
    }
}

impl ValueConverter for EnumNameConverter {
    fn name(&self) -> &str {
        "enum_name"
    }

    fn encode(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Enum(label) | Value::Text(label) => {
                self.check_label(label)?;
                Ok(Value::Text(label.clone()))
            }
            other => Err(ColumnError::conversion(
                self.name(),
                format!("cannot encode {} as {}", other.type_name(), self.def.name),
            )),
        }
    }

    fn decode(&self, raw: &Value) -> Result<Value> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Text(label) => {
                self.check_label(label)?;
                Ok(Value::Enum(label.clone()))
            }
            other => Err(ColumnError::conversion(
                self.name(),
                format!("expected text for {}, got {}", self.def.name, other.type_name()),
            )),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stores enum properties as the zero-based position of their variant
#[derive(Debug)]
pub struct EnumOrdinalConverter {
    def: EnumType,
}

impl EnumOrdinalConverter {
    pub fn new(def: EnumType) -> Self {
        Self { def }
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.def
    }
}

impl ValueConverter for EnumOrdinalConverter {
    fn name(&self) -> &str {
        "enum_ordinal"
    }

    fn encode(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Enum(label) | Value::Text(label) => self
                .def
                .ordinal_of(label)
                .map(|ordinal| Value::Int(ordinal as i64))
                .ok_or_else(|| {
                    ColumnError::conversion(
                        self.name(),
                        format!("'{}' is not a variant of {}", label, self.def.name),
                    )
                }),
            other => Err(ColumnError::conversion(
                self.name(),
                format!("cannot encode {} as {}", other.type_name(), self.def.name),
            )),
        }
    }

    fn decode(&self, raw: &Value) -> Result<Value> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Int(ordinal) => usize::try_from(*ordinal)
                .ok()
                .and_then(|i| self.def.label_at(i))
                .map(|label| Value::Enum(label.to_string()))
                .ok_or_else(|| {
                    ColumnError::conversion(
                        self.name(),
                        format!("ordinal {} out of range for {}", ordinal, self.def.name),
                    )
                }),
            other => Err(ColumnError::conversion(
                self.name(),
                format!("expected int for {}, got {}", self.def.name, other.type_name()),
            )),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stores structured values as JSON text
#[derive(Debug, Default)]
pub struct JsonConverter;

impl ValueConverter for JsonConverter {
    fn name(&self) -> &str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Json(json) => Ok(Value::Text(serde_json::to_string(json)?)),
            // Already serialized
            Value::Text(text) => Ok(Value::Text(text.clone())),
            other => Ok(Value::Text(serde_json::to_string(other)?)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<Value> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => Ok(Value::Json(serde_json::from_str(text)?)),
            Value::Json(json) => Ok(Value::Json(json.clone())),
            other => Err(ColumnError::conversion(
                self.name(),
                format!("expected JSON text, got {}", other.type_name()),
            )),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// How enum properties are stored when no converter is registered for them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EnumStrategy {
    #[default]
    Name,
    Ordinal,
}

impl EnumStrategy {
    pub fn build(&self, def: EnumType) -> Arc<dyn ValueConverter> {
        match self {
            EnumStrategy::Name => Arc::new(EnumNameConverter::new(def)),
            EnumStrategy::Ordinal => Arc::new(EnumOrdinalConverter::new(def)),
        }
    }
}

/// Look up a stateless built-in converter by name
pub fn converter_by_name(name: &str) -> Option<Arc<dyn ValueConverter>> {
    match name {
        "passthrough" => Some(Arc::new(PassthroughConverter)),
        "json" => Some(Arc::new(JsonConverter)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> EnumType {
        EnumType::new("Status", ["ACTIVE", "LOCKED", "DELETED"])
    }

    #[test]
    fn test_enum_name_conversion() {
        let converter = EnumNameConverter::new(status());
        assert_eq!(
            converter.encode(&Value::Enum("LOCKED".into())).unwrap(),
            Value::Text("LOCKED".into())
        );
        assert_eq!(
            converter.decode(&Value::Text("ACTIVE".into())).unwrap(),
            Value::Enum("ACTIVE".into())
        );
        assert!(converter.decode(&Value::Text("active".into())).is_err());
        assert!(converter.encode(&Value::Int(1)).is_err());
        assert_eq!(converter.decode(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_enum_ordinal_conversion() {
        let converter = EnumOrdinalConverter::new(status());
        assert_eq!(converter.encode(&Value::Enum("DELETED".into())).unwrap(), Value::Int(2));
        assert_eq!(converter.decode(&Value::Int(1)).unwrap(), Value::Enum("LOCKED".into()));
        assert!(converter.decode(&Value::Int(3)).is_err());
        assert!(converter.decode(&Value::Int(-1)).is_err());
        assert!(converter.encode(&Value::Enum("GONE".into())).is_err());
    }

    #[test]
    fn test_json_conversion() {
        let converter = JsonConverter;
        let json = serde_json::json!({"tags": ["a", "b"], "level": 3});
        let encoded = converter.encode(&Value::Json(json.clone())).unwrap();
        assert_eq!(converter.decode(&encoded).unwrap(), Value::Json(json));
        assert!(matches!(
            converter.decode(&Value::Text("{not json".into())),
            Err(ColumnError::Json(_))
        ));
    }

    #[test]
    fn test_strategy_builds_matching_converter() {
        assert_eq!(EnumStrategy::Name.build(status()).name(), "enum_name");
        assert_eq!(EnumStrategy::Ordinal.build(status()).name(), "enum_ordinal");
    }

    #[test]
    fn test_converter_by_name() {
        assert_eq!(converter_by_name("json").unwrap().name(), "json");
        assert!(converter_by_name("money").is_none());
    }
}
