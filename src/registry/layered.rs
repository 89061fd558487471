use crate::registry::ConverterRegistry;
use crate::types::{TypeKey, ValueConverter};
use std::sync::Arc;

/// Consults an override registry before falling back to a base registry
#[derive(Debug, Clone)]
pub struct LayeredRegistry {
    overrides: Arc<dyn ConverterRegistry>,
    base: Arc<dyn ConverterRegistry>,
}

impl LayeredRegistry {
    pub fn new(overrides: Arc<dyn ConverterRegistry>, base: Arc<dyn ConverterRegistry>) -> Self {
        Self { overrides, base }
    }
}

impl ConverterRegistry for LayeredRegistry {
    fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn ValueConverter>> {
        self.overrides.lookup(key).or_else(|| self.base.lookup(key))
    }
}
