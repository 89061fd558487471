//! Ambient configuration and the process-wide default used when a caller
//! does not supply one.

use crate::config::{CONFIG, Config};
use crate::registry::{ConverterRegistry, StaticRegistry};
use crate::{ColumnError, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration context threaded through resolution calls
#[derive(Debug, Clone)]
pub struct Configuration {
    registry: Arc<dyn ConverterRegistry>,
}

impl Configuration {
    pub fn new(registry: Arc<dyn ConverterRegistry>) -> Self {
        Self { registry }
    }

    /// Build a configuration whose registry generates enum converters with
    /// the configured strategy
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(StaticRegistry::with_enum_fallback(config.enum_strategy)))
    }

    pub fn registry(&self) -> &Arc<dyn ConverterRegistry> {
        &self.registry
    }
}

/// Supplies the configuration used when a caller passes none
pub trait GlobalConfigProvider: Send + Sync {
    /// Must return the same configuration on every call once initialized
    fn default_configuration(&self) -> Arc<Configuration>;
}

static PROCESS_DEFAULT: OnceCell<Arc<Configuration>> = OnceCell::new();

/// Install the process-wide default configuration.
///
/// Only succeeds before the default has been read or installed.
pub fn install_default_configuration(configuration: Configuration) -> Result<()> {
    PROCESS_DEFAULT
        .set(Arc::new(configuration))
        .map_err(|_| ColumnError::DefaultConfigurationAlreadySet)?;
    info!("Installed process default configuration");
    Ok(())
}

/// Provider backed by the process-wide default.
///
/// Falls back to a configuration built from environment settings when
/// nothing was installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessDefault;

impl GlobalConfigProvider for ProcessDefault {
    fn default_configuration(&self) -> Arc<Configuration> {
        PROCESS_DEFAULT
            .get_or_init(|| {
                debug!("Building default configuration from environment");
                Arc::new(Configuration::from_config(&CONFIG))
            })
            .clone()
    }
}

/// Provider that always hands out one fixed configuration
#[derive(Debug, Clone)]
pub struct FixedDefault(pub Arc<Configuration>);

impl GlobalConfigProvider for FixedDefault {
    fn default_configuration(&self) -> Arc<Configuration> {
        self.0.clone()
    }
}

/// Run `f` against the caller's configuration, or the provider's default
/// when the caller has none
pub fn with_effective_configuration<R>(
    ambient: Option<&Configuration>,
    provider: &dyn GlobalConfigProvider,
    f: impl FnOnce(&Configuration) -> R,
) -> R {
    match ambient {
        Some(configuration) => f(configuration),
        None => {
            let configuration = provider.default_configuration();
            f(&configuration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumStrategy, EnumType, TypeKey, ValueConverter};

    #[test]
    fn test_from_config_uses_enum_strategy() {
        let config = Config {
            enum_strategy: EnumStrategy::Ordinal,
            ..Config::default()
        };
        let configuration = Configuration::from_config(&config);
        let key = TypeKey::Enum(EnumType::new("Flag", ["A", "B"]));
        assert_eq!(configuration.registry().lookup(&key).unwrap().name(), "enum_ordinal");
    }

    #[test]
    fn test_effective_configuration_prefers_ambient() {
        let ambient = Configuration::new(Arc::new(StaticRegistry::new()));
        let fallback = FixedDefault(Arc::new(Configuration::new(Arc::new(
            StaticRegistry::with_enum_fallback(EnumStrategy::Name),
        ))));
        let key = TypeKey::Enum(EnumType::new("Flag", ["A"]));

        let from_ambient =
            with_effective_configuration(Some(&ambient), &fallback, |c| c.registry().lookup(&key));
        assert!(from_ambient.is_none());

        let from_default = with_effective_configuration(None, &fallback, |c| c.registry().lookup(&key));
        assert!(from_default.is_some());
    }

    #[test]
    fn test_process_default_is_stable() {
        let first = ProcessDefault.default_configuration();
        let second = ProcessDefault.default_configuration();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(
            install_default_configuration(Configuration::from_config(&Config::default())),
            Err(ColumnError::DefaultConfigurationAlreadySet)
        ));
    }
}
