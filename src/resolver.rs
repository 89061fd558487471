//! Picks the converter a column is read and written with.
//!
//! Precedence, first match wins:
//!
//! 1. a converter already memoized on the descriptor;
//! 2. a non-blank mask kind: a mask stage over the declared handler when one
//!    is set, otherwise a plain mask converter;
//! 3. the declared handler;
//! 4. for enum-typed properties, the registry of the caller's configuration,
//!    or of the provider's default configuration when the caller has none;
//! 5. nothing.
//!
//! Results from rules 2 to 4 are memoized. An absent result is not, so a
//! later call with a better-populated configuration can still succeed.

use crate::context::{GlobalConfigProvider, ProcessDefault, with_effective_configuration};
use crate::mask::{CompositeConverter, MaskRegistry};
use crate::metadata::ColumnDescriptor;
use crate::registry::ConverterRegistry;
use crate::types::ValueConverter;
use crate::{Configuration, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct HandlerResolver {
    provider: Arc<dyn GlobalConfigProvider>,
    masks: Arc<MaskRegistry>,
}

impl HandlerResolver {
    pub fn new(provider: Arc<dyn GlobalConfigProvider>, masks: Arc<MaskRegistry>) -> Self {
        Self { provider, masks }
    }

    /// Resolver backed by the process default configuration and the built-in masks
    pub fn with_process_default() -> Self {
        let masks = MaskRegistry::with_builtin(crate::config::CONFIG.mask_char);
        Self::new(Arc::new(ProcessDefault), Arc::new(masks))
    }

    /// Resolve the converter for `descriptor`.
    ///
    /// Returns `Ok(None)` when no strategy applies; the caller decides whether
    /// that is fatal for the column. The only error is a mask kind the mask
    /// registry cannot build.
    pub fn resolve(
        &self,
        descriptor: &ColumnDescriptor,
        ambient: Option<&Configuration>,
    ) -> Result<Option<Arc<dyn ValueConverter>>> {
        if let Some(resolved) = descriptor.resolved_handler() {
            return Ok(Some(resolved.clone()));
        }

        let candidate = match self.select(descriptor, ambient)? {
            Some(candidate) => candidate,
            None => {
                trace!("No converter for column {}", descriptor.column());
                return Ok(None);
            }
        };

        let resolved = descriptor.memoize(candidate);
        debug!(
            "Resolved column {} ({}) to '{}'",
            descriptor.column(),
            descriptor.property(),
            resolved.name()
        );
        Ok(Some(resolved))
    }

    fn select(
        &self,
        descriptor: &ColumnDescriptor,
        ambient: Option<&Configuration>,
    ) -> Result<Option<Arc<dyn ValueConverter>>> {
        if let Some(kind) = descriptor.effective_mask_kind() {
            let stage = self.masks.converter(kind)?;
            let converter: Arc<dyn ValueConverter> = match descriptor.declared_handler() {
                Some(inner) => Arc::new(CompositeConverter::new(inner.clone(), stage)),
                None => Arc::new(stage),
            };
            return Ok(Some(converter));
        }

        if let Some(declared) = descriptor.declared_handler() {
            return Ok(Some(declared.clone()));
        }

        match descriptor.property_type() {
            Some(key) if key.is_enum() => Ok(with_effective_configuration(
                ambient,
                self.provider.as_ref(),
                |configuration| configuration.registry().lookup(key),
            )),
            _ => Ok(None),
        }
    }
}

impl Default for HandlerResolver {
    fn default() -> Self {
        Self::with_process_default()
    }
}

impl fmt::Debug for HandlerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerResolver").field("masks", &self.masks).finish()
    }
}
