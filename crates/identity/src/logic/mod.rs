pub mod converter;
pub mod json;
pub mod profile;
pub mod provider;

use shared::error::CommonError;

pub use converter::{AttributeConverter, Conversion};
pub use profile::{AttributeValue, UserProfile};
pub use provider::{ProfileExtractor, ProviderRegistry};

const MAX_ID_LEN: usize = 128;

/// Validates an identifier used as a map key: non-empty, at most 128
/// characters, ASCII alphanumerics plus `_`, `-` and `.`.
pub fn validate_id(id: &str, kind: &str) -> Result<(), CommonError> {
    if id.is_empty() {
        return Err(CommonError::InvalidRequest {
            msg: format!("{kind} must not be empty"),
            source: None,
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(CommonError::InvalidRequest {
            msg: format!("{kind} '{id}' is longer than {MAX_ID_LEN} characters"),
            source: None,
        });
    }

    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(CommonError::InvalidRequest {
            msg: format!("{kind} '{id}' contains invalid character {c:?}"),
            source: None,
        });
    }

    Ok(())
}

#[cfg(all(test, feature = "unit_test"))]
mod unit_test {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("first_name", "Attribute name").is_ok());
        assert!(validate_id("user.birthday-2", "Attribute name").is_ok());
        assert!(validate_id("", "Attribute name").is_err());
        assert!(validate_id("first name", "Attribute name").is_err());
        assert!(validate_id(&"a".repeat(129), "Attribute name").is_err());
    }
}
