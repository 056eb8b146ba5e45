//! Provider-agnostic user profile produced by an extraction.

pub mod helper;

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer};
use serde_json::Value;
use shared::primitives::WrappedChronoDateTime;

use crate::logic::converter::ProfileEnum;

/// A value from a closed named set (gender, relationship status, ...).
///
/// `kind` identifies the set so two enums sharing a variant name never
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub kind: &'static str,
    pub name: &'static str,
}

impl EnumValue {
    pub fn new(kind: &'static str, name: &'static str) -> Self {
        Self { kind, name }
    }
}

impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// A converted attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    Date(WrappedChronoDateTime),
    Enum(EnumValue),
    /// Structured value; absent sub-fields are simply not present
    Record(BTreeMap<String, AttributeValue>),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Pass a JSON scalar through unchanged. Arrays and objects are not scalars.
    pub fn from_scalar(raw: &Value) -> Option<Self> {
        match raw {
            Value::Null => Some(AttributeValue::Null),
            Value::String(s) => Some(AttributeValue::String(s.clone())),
            Value::Number(n) => Some(AttributeValue::Number(n.clone())),
            Value::Bool(b) => Some(AttributeValue::Boolean(*b)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<WrappedChronoDateTime> {
        match self {
            AttributeValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Typed view of an enum value; `None` if the value belongs to another set.
    pub fn as_enum<E: ProfileEnum>(&self) -> Option<E> {
        match self {
            AttributeValue::Enum(value) if value.kind == E::KIND => E::from_name(value.name),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match self {
            AttributeValue::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<WrappedChronoDateTime> for AttributeValue {
    fn from(value: WrappedChronoDateTime) -> Self {
        AttributeValue::Date(value)
    }
}

impl From<EnumValue> for AttributeValue {
    fn from(value: EnumValue) -> Self {
        AttributeValue::Enum(value)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(values: Vec<T>) -> Self {
        AttributeValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Normalized profile of one authenticated user.
///
/// Built fresh by each extraction and only mutated through
/// [`helper`] while that extraction runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfile {
    pub(crate) id: Option<String>,
    pub(crate) attributes: HashMap<String, AttributeValue>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// True when neither an identifier nor any attribute was extracted.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.attributes.is_empty()
    }
}
