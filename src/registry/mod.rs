//! Converter registries keyed by [`TypeKey`].
//!
//! The resolver only ever calls [`ConverterRegistry::lookup`], and only for
//! enum-typed properties. Lookups may come from many threads at once.

use crate::types::{TypeKey, ValueConverter};
use std::fmt;
use std::sync::Arc;

pub mod layered;
pub mod static_registry;

pub use layered::LayeredRegistry;
pub use static_registry::{RegistryStats, StaticRegistry};

pub trait ConverterRegistry: Send + Sync + fmt::Debug {
    /// Converter registered for `key`, if any
    fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn ValueConverter>>;
}
