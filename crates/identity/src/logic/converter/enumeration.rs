use std::fmt::Debug;

use serde_json::Value;

use super::{AttributeConverter, Conversion};
use crate::logic::profile::{AttributeValue, EnumValue};

/// Reduce a display name to its canonical enum name:
/// - lowercases ASCII letters
/// - maps spaces, dashes and underscores to a single `_`
/// - drops every other character ("It's complicated" -> "its_complicated")
/// - trims leading and trailing `_`
pub fn normalize_enum_name(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut last_was_separator = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if (c == ' ' || c == '-' || c == '_') && !last_was_separator {
            result.push('_');
            last_was_separator = true;
        }
    }

    result.trim_matches('_').to_string()
}

/// A closed set of named values a provider field can take.
pub trait ProfileEnum: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Distinguishes this set from other enums in an [`EnumValue`].
    const KIND: &'static str;
    const VARIANTS: &'static [Self];

    /// Canonical name, already in [`normalize_enum_name`] form.
    fn name(self) -> &'static str;

    fn from_name(raw: &str) -> Option<Self> {
        let normalized = normalize_enum_name(raw);
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.name() == normalized)
    }

    fn to_value(self) -> AttributeValue {
        AttributeValue::Enum(EnumValue::new(Self::KIND, self.name()))
    }
}

/// Maps text onto a [`ProfileEnum`].
///
/// With a default, unrecognized names map to it since providers add values
/// without notice. Without one (see [`EnumConverter::strict`]) they are
/// unconvertible. Non-text input is always unconvertible.
#[derive(Debug, Clone, Copy)]
pub struct EnumConverter<E: ProfileEnum> {
    default: Option<E>,
}

impl<E: ProfileEnum> EnumConverter<E> {
    pub fn new(default: E) -> Self {
        Self {
            default: Some(default),
        }
    }

    pub fn strict() -> Self {
        Self { default: None }
    }
}

impl<E: ProfileEnum> AttributeConverter for EnumConverter<E> {
    fn convert(&self, raw: &Value) -> Conversion {
        raw.as_str()
            .and_then(|text| E::from_name(text).or(self.default))
            .map(E::to_value)
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl ProfileEnum for Gender {
    const KIND: &'static str = "gender";
    const VARIANTS: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Unspecified];

    fn name(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "unspecified",
        }
    }
}

#[cfg(all(test, feature = "unit_test"))]
mod unit_test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_enum_name() {
        assert_eq!(normalize_enum_name("It's complicated"), "its_complicated");
        assert_eq!(normalize_enum_name("  In a  relationship "), "in_a_relationship");
        assert_eq!(normalize_enum_name("FEMALE"), "female");
        assert_eq!(normalize_enum_name("--"), "");
    }

    #[test]
    fn test_gender_from_name() {
        assert_eq!(Gender::from_name("female"), Some(Gender::Female));
        assert_eq!(Gender::from_name("Male"), Some(Gender::Male));
        assert_eq!(Gender::from_name("custom"), None);
    }

    #[test]
    fn test_enum_converter_known_value() {
        let converter = EnumConverter::new(Gender::Male);
        assert_eq!(
            converter.convert(&json!("female")),
            Conversion::Converted(Gender::Female.to_value())
        );
    }

    #[test]
    fn test_enum_converter_unknown_maps_to_default() {
        let converter = EnumConverter::new(Gender::Unspecified);
        assert_eq!(
            converter.convert(&json!("non-binary")),
            Conversion::Converted(Gender::Unspecified.to_value())
        );
    }

    #[test]
    fn test_strict_enum_converter_unknown_is_unconvertible() {
        let converter = EnumConverter::<Gender>::strict();
        assert_eq!(converter.convert(&json!("other")), Conversion::Unconvertible);
    }

    #[test]
    fn test_enum_converter_non_text_is_unconvertible() {
        let converter = EnumConverter::new(Gender::Male);
        assert_eq!(converter.convert(&json!(1)), Conversion::Unconvertible);
        assert_eq!(converter.convert(&Value::Null), Conversion::Unconvertible);
    }
}
