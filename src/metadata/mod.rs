pub mod column;
pub mod mapping;
pub mod table;

pub use column::ColumnDescriptor;
pub use mapping::{ColumnMapping, TableMapping};
pub use table::{ResolvedColumn, TableDescriptor};
