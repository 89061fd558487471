use crate::metadata::{ColumnDescriptor, TableDescriptor};
use crate::types::{SqlType, TypeKey, converter_by_name};
use crate::{ColumnError, Result};
use serde::Deserialize;

/// Serialized form of a column mapping, as read from a mapping file
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub column: String,
    pub property: String,
    #[serde(default)]
    pub alias: Vec<String>,
    #[serde(default)]
    pub property_type: Option<TypeKey>,
    #[serde(default)]
    pub jdbc_type: Option<SqlType>,
    /// Name of a built-in converter, see [`converter_by_name`]
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub ignore: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableMapping {
    pub table: String,
    pub columns: Vec<ColumnMapping>,
}

impl ColumnMapping {
    pub fn into_descriptor(self) -> Result<ColumnDescriptor> {
        let mut descriptor = ColumnDescriptor::new(self.column, self.property)
            .with_alias(self.alias)
            .with_ignored(self.ignore);
        descriptor.set_property_type(self.property_type);
        descriptor.set_jdbc_type(self.jdbc_type);
        descriptor.set_mask_kind(self.mask);

        if let Some(name) = self.handler {
            let handler = converter_by_name(&name).ok_or(ColumnError::UnknownConverter(name))?;
            descriptor.set_declared_handler(Some(handler));
        }
        Ok(descriptor)
    }
}

impl TableMapping {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_descriptor(self) -> Result<TableDescriptor> {
        let columns = self
            .columns
            .into_iter()
            .map(ColumnMapping::into_descriptor)
            .collect::<Result<Vec<_>>>()?;
        Ok(TableDescriptor::new(self.table, columns))
    }
}
