use serde_json::Value;

use super::{AttributeConverter, Conversion};
use crate::logic::profile::AttributeValue;

/// Normalizes `en_US`, `en-us` or `fr` into a `en-US` / `fr` language tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleConverter;

impl LocaleConverter {
    pub fn normalize(raw: &str) -> Option<String> {
        let mut parts = raw.trim().split(['_', '-']);

        let language = parts.next()?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        let mut tag = language.to_ascii_lowercase();

        if let Some(region) = parts.next() {
            let valid_region = (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
                || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
            if !valid_region {
                return None;
            }
            tag.push('-');
            tag.push_str(&region.to_ascii_uppercase());
        }

        // variants are not carried over
        if parts.next().is_some() {
            return None;
        }

        Some(tag)
    }
}

impl AttributeConverter for LocaleConverter {
    fn convert(&self, raw: &Value) -> Conversion {
        raw.as_str()
            .and_then(Self::normalize)
            .map(AttributeValue::String)
            .into()
    }
}
