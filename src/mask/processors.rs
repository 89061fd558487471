use crate::mask::MaskConverter;
use crate::{ColumnError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_MASK_CHAR: char = '*';

/// Obscures a sensitive text value
pub trait MaskProcessor: Send + Sync {
    fn mask(&self, data: &str) -> String;
}

impl<F> MaskProcessor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn mask(&self, data: &str) -> String {
        self(data)
    }
}

/// Keeps `head` leading and `tail` trailing characters, masking the middle.
///
/// Values too short to keep both ends keep at most `head` characters and
/// always mask at least one.
#[derive(Debug, Clone, Copy)]
pub struct KeepEnds {
    pub head: usize,
    pub tail: usize,
    pub mask_char: char,
}

impl MaskProcessor for KeepEnds {
    fn mask(&self, data: &str) -> String {
        let chars: Vec<char> = data.chars().collect();
        let len = chars.len();
        if len == 0 {
            return String::new();
        }

        let (head, tail) = if self.head + self.tail >= len {
            (self.head.min(len - 1), 0)
        } else {
            (self.head, self.tail)
        };

        let mut masked = String::with_capacity(data.len());
        masked.extend(&chars[..head]);
        masked.extend(std::iter::repeat_n(self.mask_char, len - head - tail));
        masked.extend(&chars[len - tail..]);
        masked
    }
}

/// Masks the local part of an address except its first character
#[derive(Debug, Clone, Copy)]
pub struct EmailMask {
    pub mask_char: char,
}

impl MaskProcessor for EmailMask {
    fn mask(&self, data: &str) -> String {
        match data.find('@') {
            Some(at) if at > 0 => {
                let (local, domain) = data.split_at(at);
                let local = KeepEnds { head: 1, tail: 0, mask_char: self.mask_char }.mask(local);
                format!("{}{}", local, domain)
            }
            _ => KeepEnds { head: 1, tail: 0, mask_char: self.mask_char }.mask(data),
        }
    }
}

/// Replaces the whole value with a fixed-width run so the length leaks nothing
#[derive(Debug, Clone, Copy)]
pub struct PasswordMask {
    pub mask_char: char,
}

impl MaskProcessor for PasswordMask {
    fn mask(&self, data: &str) -> String {
        if data.is_empty() {
            String::new()
        } else {
            std::iter::repeat_n(self.mask_char, 6).collect()
        }
    }
}

/// Mask kinds registered by [`MaskRegistry::with_builtin`]
pub const BUILTIN_MASK_KINDS: &[&str] = &[
    "mobile",
    "fixedPhone",
    "idCard",
    "chineseName",
    "address",
    "email",
    "password",
    "carLicense",
    "bankCard",
];

/// Thread-safe table of mask processors keyed by mask kind
pub struct MaskRegistry {
    processors: RwLock<HashMap<String, Arc<dyn MaskProcessor>>>,
}

impl MaskRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            processors: RwLock::new(HashMap::new()),
        }
    }

    /// A registry holding every built-in mask kind
    pub fn with_builtin(mask_char: char) -> Self {
        let registry = Self::new();
        let keep = |head, tail| KeepEnds { head, tail, mask_char };

        registry.register("mobile", keep(3, 4));
        registry.register("fixedPhone", keep(4, 2));
        registry.register("idCard", keep(1, 2));
        registry.register("chineseName", keep(1, 0));
        registry.register("address", keep(6, 0));
        registry.register("email", EmailMask { mask_char });
        registry.register("password", PasswordMask { mask_char });
        registry.register("carLicense", keep(2, 1));
        registry.register("bankCard", keep(4, 4));
        registry
    }

    /// Register a processor, replacing any previous one for the kind
    pub fn register(&self, kind: impl Into<String>, processor: impl MaskProcessor + 'static) {
        let kind = kind.into();
        debug!("Registering mask processor '{}'", kind);
        self.processors.write().insert(kind, Arc::new(processor));
    }

    pub fn processor(&self, kind: &str) -> Option<Arc<dyn MaskProcessor>> {
        self.processors.read().get(kind.trim()).cloned()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.processors.read().contains_key(kind.trim())
    }

    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.processors.read().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Build a masking converter for `kind`.
    ///
    /// Fails with [`ColumnError::UnknownMaskKind`] when nothing is registered
    /// under that kind.
    pub fn converter(&self, kind: &str) -> Result<MaskConverter> {
        let kind = kind.trim();
        match self.processor(kind) {
            Some(processor) => Ok(MaskConverter::new(kind, processor)),
            None => {
                warn!("No mask processor registered for '{}'", kind);
                Err(ColumnError::UnknownMaskKind(kind.to_string()))
            }
        }
    }
}

impl Default for MaskRegistry {
    fn default() -> Self {
        Self::with_builtin(DEFAULT_MASK_CHAR)
    }
}

impl fmt::Debug for MaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskRegistry").field("kinds", &self.kinds()).finish()
    }
}
