//! Population of a [`UserProfile`] from a provider's JSON node.
//!
//! Absent keys are the normal case (providers return different subsets of
//! fields per user and privacy setting), so every node-based operation is a
//! no-op when its key is missing. Values a converter cannot coerce are
//! skipped the same way; nothing here returns an error.

use serde_json::Value;
use tracing::{debug, trace};

use crate::logic::converter::{AttributeConverter, Conversion, IdentityConverter};
use crate::logic::json;
use crate::logic::profile::{AttributeValue, UserProfile};

/// Set the profile identifier. A later call replaces an earlier one.
pub fn add_identifier(profile: &mut UserProfile, id: impl Into<String>) {
    let id = id.into();
    if let Some(previous) = profile.id.as_deref()
        && previous != id
    {
        debug!(previous, replacement = %id, "Overwriting profile identifier");
    }
    profile.id = Some(id);
}

/// Set the identifier from `id_key` in `node`. Absent or non-scalar ids leave
/// the identifier untouched.
pub fn add_identifier_from_node(profile: &mut UserProfile, node: &Value, id_key: &str) {
    match json::get(node, id_key).and_then(json::text_value) {
        Some(id) => add_identifier(profile, id),
        None => trace!(id_key, "No identifier in profile node"),
    }
}

/// Store `value` under `key`, replacing any previous value.
pub fn add_attribute(profile: &mut UserProfile, key: &str, value: impl Into<AttributeValue>) {
    profile.attributes.insert(key.to_string(), value.into());
}

/// Convert `raw` and store the result under `key`. An unconvertible value is
/// not stored.
pub fn add_converted_attribute(
    profile: &mut UserProfile,
    key: &str,
    raw: &Value,
    converter: &dyn AttributeConverter,
) {
    match converter.convert(raw) {
        Conversion::Converted(value) => add_attribute(profile, key, value),
        Conversion::Unconvertible => {
            debug!(key, ?converter, "Skipping attribute with unconvertible value");
        }
    }
}

/// Look up `key` in `node` and store it, converted when a converter is given
/// and passed through as a scalar otherwise.
pub fn add_attribute_from_node(
    profile: &mut UserProfile,
    node: &Value,
    key: &str,
    converter: Option<&dyn AttributeConverter>,
) {
    let Some(raw) = json::get(node, key) else {
        trace!(key, "Attribute absent from profile node");
        return;
    };

    add_converted_attribute(profile, key, raw, converter.unwrap_or(&IdentityConverter));
}
