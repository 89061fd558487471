use crate::metadata::ColumnDescriptor;
use crate::resolver::HandlerResolver;
use crate::types::ValueConverter;
use crate::{Configuration, Result};
use std::sync::Arc;

/// Column descriptors of one mapped entity table, in declaration order
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    table: String,
    columns: Vec<Arc<ColumnDescriptor>>,
}

/// A column together with the converter resolved for it
#[derive(Debug, Clone)]
pub struct ResolvedColumn {
    pub descriptor: Arc<ColumnDescriptor>,
    pub converter: Option<Arc<dyn ValueConverter>>,
}

impl TableDescriptor {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[Arc<ColumnDescriptor>] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Arc<ColumnDescriptor>> {
        self.columns.iter().find(|c| c.column().eq_ignore_ascii_case(name))
    }

    /// Find the column a result-set label refers to.
    ///
    /// Column names are checked before aliases; among aliases the first
    /// declared match wins.
    pub fn column_for_label(&self, label: &str) -> Option<&Arc<ColumnDescriptor>> {
        self.column(label).or_else(|| {
            self.columns
                .iter()
                .find(|c| c.alias_position(label).is_some())
        })
    }

    /// Columns that take part in generated statements
    pub fn statement_columns(&self) -> impl Iterator<Item = &Arc<ColumnDescriptor>> {
        self.columns.iter().filter(|c| !c.is_ignored())
    }

    /// Resolve every column in declaration order
    pub fn resolve_all(
        &self,
        resolver: &HandlerResolver,
        ambient: Option<&Configuration>,
    ) -> Result<Vec<ResolvedColumn>> {
        self.columns
            .iter()
            .map(|descriptor| -> Result<ResolvedColumn> {
                Ok(ResolvedColumn {
                    descriptor: descriptor.clone(),
                    converter: resolver.resolve(descriptor, ambient)?,
                })
            })
            .collect()
    }
}
