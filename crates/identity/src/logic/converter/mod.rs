//! Per-attribute value conversion.
//!
//! A converter turns one raw JSON scalar into an [`AttributeValue`]. It
//! reports input it cannot coerce with [`Conversion::Unconvertible`] instead
//! of failing, so one bad field never aborts the rest of an extraction.

mod date;
mod enumeration;
mod locale;

use std::fmt::Debug;

use serde_json::Value;

use crate::logic::profile::AttributeValue;

pub use date::DateConverter;
pub use enumeration::{EnumConverter, Gender, ProfileEnum, normalize_enum_name};
pub use locale::LocaleConverter;

/// Outcome of a conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Converted(AttributeValue),
    Unconvertible,
}

impl From<Option<AttributeValue>> for Conversion {
    fn from(value: Option<AttributeValue>) -> Self {
        match value {
            Some(value) => Conversion::Converted(value),
            None => Conversion::Unconvertible,
        }
    }
}

/// Pure function from a raw JSON scalar to a converted value.
///
/// Implementations hold configuration only and may be shared across threads.
pub trait AttributeConverter: Send + Sync + Debug {
    fn convert(&self, raw: &Value) -> Conversion;
}

/// Passes scalars through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl AttributeConverter for IdentityConverter {
    fn convert(&self, raw: &Value) -> Conversion {
        AttributeValue::from_scalar(raw).into()
    }
}
