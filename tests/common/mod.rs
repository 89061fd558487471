#![allow(dead_code)]

use column_resolver::context::{Configuration, FixedDefault};
use column_resolver::mask::MaskRegistry;
use column_resolver::registry::{ConverterRegistry, StaticRegistry};
use column_resolver::resolver::HandlerResolver;
use column_resolver::types::{EnumType, TypeKey, ValueConverter};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Registry that counts lookups before delegating
#[derive(Debug, Default)]
pub struct CountingRegistry {
    pub inner: StaticRegistry,
    lookups: AtomicUsize,
}

impl CountingRegistry {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ConverterRegistry for CountingRegistry {
    fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn ValueConverter>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(key)
    }
}

pub fn gender() -> TypeKey {
    TypeKey::Enum(EnumType::new("Gender", ["MALE", "FEMALE"]))
}

/// Configuration whose registry maps `key` to `converter`
pub fn configuration_with(key: TypeKey, converter: Arc<dyn ValueConverter>) -> Configuration {
    let registry = StaticRegistry::new();
    registry.register(key, converter);
    Configuration::new(Arc::new(registry))
}

/// Resolver whose default configuration is `default`, with the built-in masks
pub fn resolver_with_default(default: Configuration) -> HandlerResolver {
    HandlerResolver::new(
        Arc::new(FixedDefault(Arc::new(default))),
        Arc::new(MaskRegistry::default()),
    )
}
