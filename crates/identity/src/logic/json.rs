//! Read-only access to a provider's parsed profile document.

use serde_json::Value;
use shared::error::CommonError;

/// Parse a response body and return its entry node.
///
/// Some providers wrap the profile object in an array, so a root array
/// resolves to its first element. A blank body or an empty array has no
/// entry node and yields `Ok(None)`. Text that is not JSON at all is an error.
pub fn first_node(body: &str) -> Result<Option<Value>, CommonError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let root: Value = serde_json::from_str(body).map_err(|e| CommonError::InvalidResponse {
        msg: format!("Profile response is not valid JSON: {e}"),
        source: Some(e.into()),
    })?;

    match root {
        Value::Array(mut elements) => {
            if elements.is_empty() {
                Ok(None)
            } else {
                Ok(Some(elements.swap_remove(0)))
            }
        }
        other => Ok(Some(other)),
    }
}

/// Look up `key` in an object node.
///
/// Returns `None` when the key is absent or `node` is not an object. A key
/// that is present with a JSON `null` returns `Some(&Value::Null)`.
pub fn get<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.as_object().and_then(|object| object.get(key))
}

/// Text rendering of a scalar node, used for identifiers and plain strings.
pub fn text_value(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text of `key` in `node`, if present and scalar.
pub fn get_text(node: &Value, key: &str) -> Option<String> {
    get(node, key).and_then(text_value)
}

/// Elements of an array node. Anything else has no elements.
pub fn elements(node: &Value) -> impl Iterator<Item = &Value> {
    node.as_array().into_iter().flatten()
}
