//! Column metadata and value-conversion resolution for an object-relational
//! mapping layer.
//!
//! A [`metadata::ColumnDescriptor`] describes one mapped column. The
//! [`resolver::HandlerResolver`] decides which [`types::ValueConverter`] reads
//! and writes that column: a masking wrapper, an explicitly declared handler,
//! or an enum converter looked up in the [`registry::ConverterRegistry`] of the
//! ambient [`context::Configuration`]. The first non-absent answer is memoized
//! on the descriptor.

pub mod config;
pub mod context;
pub mod mask;
pub mod metadata;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod types;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("Unknown mask kind: {0}")]
    UnknownMaskKind(String),

    #[error("Unknown converter: {0}")]
    UnknownConverter(String),

    #[error("Conversion failed in {converter}: {message}")]
    Conversion { converter: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Default configuration has already been initialized")]
    DefaultConfigurationAlreadySet,
}

pub type Result<T> = std::result::Result<T, ColumnError>;

impl ColumnError {
    pub(crate) fn conversion(converter: &str, message: impl Into<String>) -> Self {
        ColumnError::Conversion {
            converter: converter.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error comes from building a converter rather than running one
    pub fn is_construction_error(&self) -> bool {
        matches!(self, ColumnError::UnknownMaskKind(_))
    }
}

pub use context::{Configuration, GlobalConfigProvider, ProcessDefault};
pub use metadata::{ColumnDescriptor, TableDescriptor};
pub use resolver::HandlerResolver;
pub use types::{TypeKey, Value, ValueConverter};
