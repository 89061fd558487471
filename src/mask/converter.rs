use crate::mask::MaskProcessor;
use crate::types::{Value, ValueConverter};
use crate::Result;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

thread_local! {
    static SUSPEND_DEPTH: Cell<u32> = const { Cell::new(0) };
}

struct SuspendGuard;

impl SuspendGuard {
    fn enter() -> Self {
        SUSPEND_DEPTH.with(|depth| depth.set(depth.get() + 1));
        SuspendGuard
    }
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        SUSPEND_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `f` with masking suspended on the current thread.
///
/// Calls nest; masking resumes once the outermost call returns or unwinds.
pub fn without_masking<R>(f: impl FnOnce() -> R) -> R {
    let _guard = SuspendGuard::enter();
    f()
}

pub fn is_masking_suspended() -> bool {
    SUSPEND_DEPTH.with(|depth| depth.get() > 0)
}

/// Masks text values read from the column; writes pass through unchanged
#[derive(Clone)]
pub struct MaskConverter {
    kind: String,
    processor: Arc<dyn MaskProcessor>,
}

impl MaskConverter {
    pub fn new(kind: impl Into<String>, processor: Arc<dyn MaskProcessor>) -> Self {
        Self {
            kind: kind.into(),
            processor,
        }
    }

    pub fn mask_kind(&self) -> &str {
        &self.kind
    }

    /// Apply the mask to an already decoded value
    pub fn apply(&self, value: Value) -> Value {
        match value {
            Value::Text(text) if !is_masking_suspended() => Value::Text(self.processor.mask(&text)),
            other => other,
        }
    }
}

impl fmt::Debug for MaskConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskConverter").field("kind", &self.kind).finish()
    }
}

impl ValueConverter for MaskConverter {
    fn name(&self) -> &str {
        "mask"
    }

    fn encode(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn decode(&self, raw: &Value) -> Result<Value> {
        Ok(self.apply(raw.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Runs a declared converter and layers a mask stage over what it decodes
#[derive(Debug)]
pub struct CompositeConverter {
    inner: Arc<dyn ValueConverter>,
    stage: MaskConverter,
}

impl CompositeConverter {
    pub fn new(inner: Arc<dyn ValueConverter>, stage: MaskConverter) -> Self {
        Self { inner, stage }
    }

    /// The converter doing the actual type conversion
    pub fn delegate(&self) -> &Arc<dyn ValueConverter> {
        &self.inner
    }

    pub fn mask_kind(&self) -> &str {
        self.stage.mask_kind()
    }
}

impl ValueConverter for CompositeConverter {
    fn name(&self) -> &str {
        "composite_mask"
    }

    fn encode(&self, value: &Value) -> Result<Value> {
        self.inner.encode(value)
    }

    fn decode(&self, raw: &Value) -> Result<Value> {
        let decoded = self.inner.decode(raw)?;
        Ok(self.stage.apply(decoded))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::MaskRegistry;
    use crate::types::{JsonConverter, PassthroughConverter};

    #[test]
    fn test_mask_only_applies_on_read() {
        let converter = MaskRegistry::default().converter("mobile").unwrap();
        assert_eq!(converter.mask_kind(), "mobile");
        assert_eq!(
            converter.encode(&Value::from("13812345678")).unwrap(),
            Value::from("13812345678")
        );
        assert_eq!(
            converter.decode(&Value::from("13812345678")).unwrap(),
            Value::from("138****5678")
        );
        assert_eq!(converter.decode(&Value::Int(7)).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_without_masking_nests() {
        let converter = MaskRegistry::default().converter("bankCard").unwrap();
        let raw = Value::from("6222020200112233");

        let plain = without_masking(|| {
            let inner = without_masking(|| converter.decode(&raw).unwrap());
            assert!(is_masking_suspended());
            (inner, converter.decode(&raw).unwrap())
        });
        assert_eq!(plain, (raw.clone(), raw.clone()));
        assert!(!is_masking_suspended());
        assert_eq!(converter.decode(&raw).unwrap(), Value::from("6222********2233"));
    }

    #[test]
    fn test_composite_decodes_then_masks() {
        let registry = MaskRegistry::default();
        registry.register("redact_json", |_: &str| "{}".to_string());

        // Inner converter output is text here, so the stage sees it
        let composite = CompositeConverter::new(
            Arc::new(PassthroughConverter),
            registry.converter("email").unwrap(),
        );
        assert_eq!(composite.delegate().name(), "passthrough");
        assert_eq!(
            composite.decode(&Value::from("ann@example.com")).unwrap(),
            Value::from("a**@example.com")
        );

        // Non-text output from the inner converter is left alone
        let composite = CompositeConverter::new(
            Arc::new(JsonConverter),
            registry.converter("redact_json").unwrap(),
        );
        assert_eq!(
            composite.decode(&Value::from("[1,2]")).unwrap(),
            Value::Json(serde_json::json!([1, 2]))
        );
        assert_eq!(composite.encode(&Value::Json(serde_json::json!({}))).unwrap(), Value::from("{}"));
    }

    #[test]
    fn test_composite_propagates_inner_errors() {
        use crate::types::{EnumNameConverter, EnumType};

        let composite = CompositeConverter::new(
            Arc::new(EnumNameConverter::new(EnumType::new("Level", ["LOW", "HIGH"]))),
            MaskRegistry::default().converter("chineseName").unwrap(),
        );
        assert!(composite.decode(&Value::from("MEDIUM")).is_err());
        assert_eq!(composite.decode(&Value::from("HIGH")).unwrap(), Value::Enum("HIGH".into()));
    }
}
