//! Structured Facebook values built directly from JSON sub-nodes.
//!
//! Each record converts into an [`AttributeValue::Record`] whose keys are the
//! Graph API field names, and back again for the typed profile accessors.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use shared::primitives::WrappedChronoDateTime;

use crate::logic::converter::DateConverter;
use crate::logic::json;
use crate::logic::profile::AttributeValue;

type Fields = BTreeMap<String, AttributeValue>;

fn put(fields: &mut Fields, key: &str, value: Option<impl Into<AttributeValue>>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value.into());
    }
}

fn field_text(fields: &Fields, key: &str) -> Option<String> {
    fields.get(key).and_then(AttributeValue::as_str).map(str::to_string)
}

fn field_object(fields: &Fields, key: &str) -> Option<FacebookObject> {
    fields.get(key).and_then(FacebookObject::from_value)
}

/// Object sub-node under `key`; anything but an object counts as absent.
fn sub_object<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    json::get(node, key).filter(|sub| sub.is_object())
}

fn objects(node: &Value) -> impl Iterator<Item = &Value> {
    json::elements(node).filter(|element| element.is_object())
}

/// The `{ "id": ..., "name": ... }` reference Facebook uses for pages,
/// places and people.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacebookObject {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl FacebookObject {
    pub fn from_node(node: &Value) -> Self {
        Self {
            id: json::get_text(node, "id"),
            name: json::get_text(node, "name"),
        }
    }

    /// Objects of an array node, in order. Non-object elements are skipped.
    pub fn list_from_node(node: &Value) -> Vec<Self> {
        objects(node).map(Self::from_node).collect()
    }

    pub fn from_value(value: &AttributeValue) -> Option<Self> {
        let fields = value.as_record()?;
        Some(Self {
            id: field_text(fields, "id"),
            name: field_text(fields, "name"),
        })
    }
}

impl From<FacebookObject> for AttributeValue {
    fn from(object: FacebookObject) -> Self {
        let mut fields = Fields::new();
        put(&mut fields, "id", object.id);
        put(&mut fields, "name", object.name);
        AttributeValue::Record(fields)
    }
}

/// One entry of the `education` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacebookEducation {
    pub school: Option<FacebookObject>,
    pub degree: Option<FacebookObject>,
    pub year: Option<FacebookObject>,
    pub concentration: Vec<FacebookObject>,
    /// `High School`, `College`, ... (the Graph API `type` field)
    pub kind: Option<String>,
}

impl FacebookEducation {
    pub fn from_node(node: &Value) -> Self {
        Self {
            school: sub_object(node, "school").map(FacebookObject::from_node),
            degree: sub_object(node, "degree").map(FacebookObject::from_node),
            year: sub_object(node, "year").map(FacebookObject::from_node),
            concentration: json::get(node, "concentration")
                .map(FacebookObject::list_from_node)
                .unwrap_or_default(),
            kind: json::get_text(node, "type"),
        }
    }

    pub fn list_from_node(node: &Value) -> Vec<Self> {
        objects(node).map(Self::from_node).collect()
    }

    pub fn from_value(value: &AttributeValue) -> Option<Self> {
        let fields = value.as_record()?;
        Some(Self {
            school: field_object(fields, "school"),
            degree: field_object(fields, "degree"),
            year: field_object(fields, "year"),
            concentration: fields
                .get("concentration")
                .and_then(AttributeValue::as_list)
                .map(|items| items.iter().filter_map(FacebookObject::from_value).collect())
                .unwrap_or_default(),
            kind: field_text(fields, "type"),
        })
    }
}

impl From<FacebookEducation> for AttributeValue {
    fn from(education: FacebookEducation) -> Self {
        let mut fields = Fields::new();
        put(&mut fields, "school", education.school);
        put(&mut fields, "degree", education.degree);
        put(&mut fields, "year", education.year);
        if !education.concentration.is_empty() {
            fields.insert("concentration".to_string(), education.concentration.into());
        }
        put(&mut fields, "type", education.kind);
        AttributeValue::Record(fields)
    }
}

/// One entry of the `work` list. Dates come as `yyyy-MM`; Facebook sends
/// `0000-00` for an unknown date, which is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacebookWork {
    pub employer: Option<FacebookObject>,
    pub location: Option<FacebookObject>,
    pub position: Option<FacebookObject>,
    pub description: Option<String>,
    pub start_date: Option<WrappedChronoDateTime>,
    pub end_date: Option<WrappedChronoDateTime>,
}

impl FacebookWork {
    pub fn from_node(node: &Value, dates: &DateConverter) -> Self {
        let date = |key: &str| json::get_text(node, key).and_then(|raw| dates.parse(&raw));
        Self {
            employer: sub_object(node, "employer").map(FacebookObject::from_node),
            location: sub_object(node, "location").map(FacebookObject::from_node),
            position: sub_object(node, "position").map(FacebookObject::from_node),
            description: json::get_text(node, "description"),
            start_date: date("start_date"),
            end_date: date("end_date"),
        }
    }

    pub fn list_from_node(node: &Value, dates: &DateConverter) -> Vec<Self> {
        objects(node).map(|work| Self::from_node(work, dates)).collect()
    }

    pub fn from_value(value: &AttributeValue) -> Option<Self> {
        let fields = value.as_record()?;
        Some(Self {
            employer: field_object(fields, "employer"),
            location: field_object(fields, "location"),
            position: field_object(fields, "position"),
            description: field_text(fields, "description"),
            start_date: fields.get("start_date").and_then(AttributeValue::as_date),
            end_date: fields.get("end_date").and_then(AttributeValue::as_date),
        })
    }
}

impl From<FacebookWork> for AttributeValue {
    fn from(work: FacebookWork) -> Self {
        let mut fields = Fields::new();
        put(&mut fields, "employer", work.employer);
        put(&mut fields, "location", work.location);
        put(&mut fields, "position", work.position);
        put(&mut fields, "description", work.description);
        put(&mut fields, "start_date", work.start_date);
        put(&mut fields, "end_date", work.end_date);
        AttributeValue::Record(fields)
    }
}
