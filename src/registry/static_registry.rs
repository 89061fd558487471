use crate::registry::ConverterRegistry;
use crate::types::{EnumStrategy, TypeKey, ValueConverter};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Map-backed registry.
///
/// With an enum fallback strategy, a lookup for an unregistered enum key
/// builds a converter for it on the spot and keeps it for later lookups.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    converters: RwLock<HashMap<TypeKey, Arc<dyn ValueConverter>>>,
    enum_fallback: Option<EnumStrategy>,
    hits: AtomicU64,
    misses: AtomicU64,
    generated: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub generated: u64,
}

impl StaticRegistry {
    /// A registry that only knows what is registered
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enum_fallback(strategy: EnumStrategy) -> Self {
        Self {
            enum_fallback: Some(strategy),
            ..Self::default()
        }
    }

    pub fn enum_fallback(&self) -> Option<EnumStrategy> {
        self.enum_fallback
    }

    /// Register a converter, returning the one it replaced
    pub fn register(
        &self,
        key: TypeKey,
        converter: Arc<dyn ValueConverter>,
    ) -> Option<Arc<dyn ValueConverter>> {
        debug!("Registering converter '{}' for {}", converter.name(), key);
        self.converters.write().insert(key, converter)
    }

    pub fn unregister(&self, key: &TypeKey) -> Option<Arc<dyn ValueConverter>> {
        self.converters.write().remove(key)
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.converters.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.converters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.read().is_empty()
    }

    pub fn clear(&self) {
        self.converters.write().clear();
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
        }
    }
}

impl ConverterRegistry for StaticRegistry {
    fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn ValueConverter>> {
        if let Some(converter) = self.converters.read().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(converter.clone());
        }

        match (self.enum_fallback, key.as_enum()) {
            (Some(strategy), Some(def)) => {
                let mut converters = self.converters.write();
                // Another thread may have generated it while we waited for the lock
                let converter = converters
                    .entry(key.clone())
                    .or_insert_with(|| {
                        self.generated.fetch_add(1, Ordering::Relaxed);
                        debug!("Generated {:?} enum converter for {}", strategy, def.name);
                        strategy.build(def.clone())
                    })
                    .clone();
                Some(converter)
            }
            _ => {
                trace!("No converter registered for {}", key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumType, JsonConverter, PassthroughConverter};

    fn status() -> TypeKey {
        TypeKey::Enum(EnumType::new("Status", ["ON", "OFF"]))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = StaticRegistry::new();
        assert!(registry.lookup(&TypeKey::Json).is_none());

        let json: Arc<dyn ValueConverter> = Arc::new(JsonConverter);
        assert!(registry.register(TypeKey::Json, json.clone()).is_none());
        assert!(Arc::ptr_eq(&registry.lookup(&TypeKey::Json).unwrap(), &json));

        let replaced = registry.register(TypeKey::Json, Arc::new(PassthroughConverter)).unwrap();
        assert!(Arc::ptr_eq(&replaced, &json));
        assert_eq!(registry.len(), 1);

        registry.unregister(&TypeKey::Json);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_enum_miss_without_fallback() {
        let registry = StaticRegistry::new();
        assert!(registry.lookup(&status()).is_none());
        assert_eq!(registry.stats().misses, 1);
    }

    #[test]
    fn test_enum_fallback_generates_once() {
        let registry = StaticRegistry::with_enum_fallback(EnumStrategy::Ordinal);
        let first = registry.lookup(&status()).unwrap();
        let second = registry.lookup(&status()).unwrap();

        assert_eq!(first.name(), "enum_ordinal");
        assert!(Arc::ptr_eq(&first, &second));
        let stats = registry.stats();
        assert_eq!(stats.generated, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);

        // Scalars are never generated
        assert!(registry.lookup(&TypeKey::Text).is_none());
    }

    #[test]
    fn test_registered_enum_wins_over_fallback() {
        let registry = StaticRegistry::with_enum_fallback(EnumStrategy::Name);
        let custom: Arc<dyn ValueConverter> = Arc::new(PassthroughConverter);
        registry.register(status(), custom.clone());
        assert!(Arc::ptr_eq(&registry.lookup(&status()).unwrap(), &custom));
        assert_eq!(registry.stats().generated, 0);
    }
}
