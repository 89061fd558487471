// Module for type tags, values and converters
pub mod type_key;
pub mod value;
pub mod value_converter;

pub use type_key::{EnumType, SqlType, TypeKey};
pub use value::Value;
pub use value_converter::{
    EnumNameConverter, EnumOrdinalConverter, EnumStrategy, JsonConverter, PassthroughConverter,
    ValueConverter, converter_by_name,
};
