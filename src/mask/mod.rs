//! Data masking: processors that obscure sensitive text and the converters
//! that apply them when a column is read.

pub mod converter;
pub mod processors;

pub use converter::{CompositeConverter, MaskConverter, is_masking_suspended, without_masking};
pub use processors::{
    BUILTIN_MASK_KINDS, DEFAULT_MASK_CHAR, EmailMask, KeepEnds, MaskProcessor, MaskRegistry,
    PasswordMask,
};
