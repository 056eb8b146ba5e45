//! Provider extractors and the pieces every provider shares.

pub mod facebook;
pub mod oauth;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use shared::error::CommonError;
use tracing::{debug, warn};

use crate::logic::converter::AttributeConverter;
use crate::logic::profile::UserProfile;
use crate::logic::profile::helper::add_attribute_from_node;
use crate::logic::validate_id;

// ============================================
// Declaration table
// ============================================

/// Flat attributes a provider extracts: name -> converter. A missing
/// converter passes the raw scalar through.
///
/// Frozen once built and shared read-only by every extraction.
#[derive(Debug, Clone, Default)]
pub struct AttributeDeclarations {
    entries: BTreeMap<String, Option<Arc<dyn AttributeConverter>>>,
}

impl AttributeDeclarations {
    pub fn builder() -> AttributeDeclarationsBuilder {
        AttributeDeclarationsBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `Some(None)` for a declared raw attribute, `None` if undeclared.
    pub fn converter(&self, name: &str) -> Option<Option<&dyn AttributeConverter>> {
        self.entries.get(name).map(|converter| converter.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&dyn AttributeConverter>)> {
        self.entries
            .iter()
            .map(|(name, converter)| (name.as_str(), converter.as_deref()))
    }
}

#[derive(Debug, Default)]
pub struct AttributeDeclarationsBuilder {
    entries: BTreeMap<String, Option<Arc<dyn AttributeConverter>>>,
    duplicates: Vec<String>,
}

impl AttributeDeclarationsBuilder {
    fn insert(&mut self, name: &str, converter: Option<Arc<dyn AttributeConverter>>) {
        if self.entries.insert(name.to_string(), converter).is_some() {
            self.duplicates.push(name.to_string());
        }
    }

    /// Declare attributes stored without conversion.
    pub fn with_raw<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            self.insert(name, None);
        }
        self
    }

    pub fn with_converter(
        mut self,
        name: &str,
        converter: impl AttributeConverter + 'static,
    ) -> Self {
        self.insert(name, Some(Arc::new(converter)));
        self
    }

    /// Freeze the table. Every name must be a valid id and declared once.
    pub fn build(self) -> Result<AttributeDeclarations, CommonError> {
        if !self.duplicates.is_empty() {
            return Err(CommonError::InvalidRequest {
                msg: format!(
                    "Attributes declared more than once: {}",
                    self.duplicates.join(", ")
                ),
                source: None,
            });
        }

        for name in self.entries.keys() {
            validate_id(name, "Attribute name")?;
        }

        Ok(AttributeDeclarations {
            entries: self.entries,
        })
    }
}

/// Run the flat pass: one lookup-and-maybe-store per declared attribute.
pub fn populate_declared_attributes(
    profile: &mut UserProfile,
    node: &Value,
    declarations: &AttributeDeclarations,
) {
    for (name, converter) in declarations.iter() {
        add_attribute_from_node(profile, node, name, converter);
    }
}

// ============================================
// Extractor abstraction
// ============================================

/// Turns an already-fetched profile response body into a [`UserProfile`].
///
/// Only a body that is not JSON at all is an error. Missing or
/// unconvertible fields are left out of the profile.
pub trait ProfileExtractor: Send + Sync {
    /// Registry key, e.g. `facebook`
    fn name(&self) -> &'static str;

    /// URL the transport layer queries once per authenticated session
    fn profile_url(&self) -> &str;

    fn declarations(&self) -> &AttributeDeclarations;

    fn extract_user_profile(&self, body: &str) -> Result<UserProfile, CommonError>;

    /// Like [`ProfileExtractor::extract_user_profile`], but a malformed body
    /// yields an empty profile instead of an error.
    fn extract_user_profile_or_empty(&self, body: &str) -> UserProfile {
        match self.extract_user_profile(body) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(
                    provider = self.name(),
                    kind = e.name(),
                    error = %e,
                    "Discarding unusable profile response"
                );
                UserProfile::new()
            }
        }
    }
}

// ============================================
// Registry
// ============================================

/// Extractors keyed by provider name.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn ProfileExtractor>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn ProfileExtractor>) -> Result<(), CommonError> {
        let name = provider.name();
        if self.providers.contains_key(name) {
            return Err(CommonError::InvalidRequest {
                msg: format!("Provider '{name}' is already registered"),
                source: None,
            });
        }
        debug!(
            provider = name,
            attributes = provider.declarations().len(),
            "Registered profile provider"
        );
        self.providers.insert(name, provider);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ProfileExtractor>> {
        self.providers.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.providers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn extract(&self, provider: &str, body: &str) -> Result<UserProfile, CommonError> {
        let extractor = self
            .get(provider)
            .ok_or_else(|| CommonError::InvalidRequest {
                msg: format!("Unknown provider '{provider}'"),
                source: None,
            })?;
        extractor.extract_user_profile(body)
    }
}
