//! Facebook Graph API profile extraction.
//!
//! Field reference: <http://developers.facebook.com/docs/reference/api/user/>

mod profile;
mod records;

pub use profile::*;
pub use records::{FacebookEducation, FacebookObject, FacebookWork};

use oauth2::{CsrfToken, PkceCodeChallenge};
use serde_json::Value;
use shared::error::CommonError;
use tracing::{debug, trace};

use super::oauth::{
    AuthorizationUrlParams, OauthEndpoints, OauthProviderConfig, build_authorization_url,
};
use super::{AttributeDeclarations, ProfileExtractor, populate_declared_attributes};
use crate::logic::converter::{DateConverter, EnumConverter, Gender, LocaleConverter};
use crate::logic::json::{self, first_node};
use crate::logic::profile::helper::{add_attribute, add_identifier_from_node};
use crate::logic::profile::{AttributeValue, UserProfile};

pub const PROVIDER_NAME: &str = "facebook";
pub const PROFILE_URL: &str = "https://graph.facebook.com/me";
pub const AUTHORIZATION_ENDPOINT: &str = "https://www.facebook.com/dialog/oauth";
pub const TOKEN_ENDPOINT: &str = "https://graph.facebook.com/oauth/access_token";
/// Prefix of the `*_CLIENT_ID`, `*_CLIENT_SECRET`, ... environment variables
pub const ENV_PREFIX: &str = "FACEBOOK";

const UPDATED_TIME_PATTERN: &str = "yyyy-MM-dd'T'HH:mm:ssz";
const BIRTHDAY_PATTERN: &str = "MM/dd/yyyy";
const WORK_DATE_PATTERN: &str = "yyyy-MM";

const RAW_ATTRIBUTES: [&str; 15] = [
    NAME,
    FIRST_NAME,
    MIDDLE_NAME,
    LAST_NAME,
    LINK,
    USERNAME,
    THIRD_PARTY_ID,
    TIMEZONE,
    VERIFIED,
    BIO,
    EMAIL,
    POLITICAL,
    QUOTES,
    RELIGION,
    WEBSITE,
];

/// JSON shape of a structured field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StructuredShape {
    Object,
    ObjectList,
    StringList,
    EducationList,
    WorkList,
}

const STRUCTURED_ATTRIBUTES: [(&str, StructuredShape); 9] = [
    (LANGUAGES, StructuredShape::ObjectList),
    (EDUCATION, StructuredShape::EducationList),
    (HOMETOWN, StructuredShape::Object),
    (INTERESTED_IN, StructuredShape::StringList),
    (LOCATION, StructuredShape::Object),
    (FAVORITE_ATHLETES, StructuredShape::ObjectList),
    (FAVORITE_TEAMS, StructuredShape::ObjectList),
    (SIGNIFICANT_OTHER, StructuredShape::Object),
    (WORK, StructuredShape::WorkList),
];

fn facebook_declarations() -> Result<AttributeDeclarations, CommonError> {
    AttributeDeclarations::builder()
        .with_raw(RAW_ATTRIBUTES)
        .with_converter(GENDER, EnumConverter::new(Gender::Male))
        .with_converter(LOCALE, LocaleConverter)
        .with_converter(UPDATED_TIME, DateConverter::new(UPDATED_TIME_PATTERN)?)
        .with_converter(BIRTHDAY, DateConverter::new(BIRTHDAY_PATTERN)?)
        .with_converter(
            RELATIONSHIP_STATUS,
            EnumConverter::<FacebookRelationshipStatus>::strict(),
        )
        .build()
}

/// Builds [`FacebookProfile`]s from `graph.facebook.com/me` responses.
///
/// Holds only immutable configuration, so one instance serves any number of
/// concurrent extractions.
#[derive(Debug, Clone)]
pub struct FacebookProvider {
    endpoints: OauthEndpoints,
    oauth_config: Option<OauthProviderConfig>,
    declarations: AttributeDeclarations,
    work_dates: DateConverter,
}

impl FacebookProvider {
    pub fn new() -> Result<Self, CommonError> {
        Ok(Self {
            endpoints: OauthEndpoints {
                authorization_endpoint: AUTHORIZATION_ENDPOINT.to_string(),
                token_endpoint: TOKEN_ENDPOINT.to_string(),
            },
            oauth_config: None,
            declarations: facebook_declarations()?,
            work_dates: DateConverter::new(WORK_DATE_PATTERN)?,
        })
    }

    /// Provider with client credentials read from `FACEBOOK_*` variables.
    pub fn from_env() -> Result<Self, CommonError> {
        shared::env::configure_env()?;
        Ok(Self::new()?.with_oauth_config(OauthProviderConfig::from_env(ENV_PREFIX)?))
    }

    pub fn with_oauth_config(mut self, config: OauthProviderConfig) -> Self {
        self.oauth_config = Some(config);
        self
    }

    pub fn oauth_config(&self) -> Option<&OauthProviderConfig> {
        self.oauth_config.as_ref()
    }

    /// Login dialog URL for the configured client. The PKCE challenge is
    /// optional since Facebook only enforces it for public clients.
    pub fn authorization_url(
        &self,
        csrf_state: &CsrfToken,
        pkce_challenge: Option<&PkceCodeChallenge>,
    ) -> Result<String, CommonError> {
        let config = self
            .oauth_config
            .as_ref()
            .ok_or_else(|| CommonError::InvalidRequest {
                msg: "Facebook provider has no OAuth client configuration".to_string(),
                source: None,
            })?;

        build_authorization_url(AuthorizationUrlParams {
            endpoints: &self.endpoints,
            config,
            csrf_state,
            pkce_challenge,
        })
    }

    /// Extract a typed Facebook profile from a profile response body.
    pub fn extract_facebook_profile(&self, body: &str) -> Result<FacebookProfile, CommonError> {
        let mut profile = UserProfile::new();

        match first_node(body)? {
            Some(node) if node.is_object() => {
                add_identifier_from_node(&mut profile, &node, ID);
                populate_declared_attributes(&mut profile, &node, &self.declarations);
                self.add_structured_attributes(&mut profile, &node);
            }
            Some(_) => debug!(provider = PROVIDER_NAME, "Profile entry node is not an object"),
            None => debug!(provider = PROVIDER_NAME, "Profile response has no entry node"),
        }

        debug!(
            provider = PROVIDER_NAME,
            id = profile.id(),
            attributes = profile.attributes().len(),
            "Extracted user profile"
        );

        Ok(FacebookProfile::new(profile))
    }

    fn add_structured_attributes(&self, profile: &mut UserProfile, node: &Value) {
        for (name, shape) in STRUCTURED_ATTRIBUTES {
            let Some(sub_node) = json::get(node, name) else {
                trace!(attribute = name, "Structured attribute absent");
                continue;
            };

            match self.structured_value(shape, sub_node) {
                Some(value) => add_attribute(profile, name, value),
                None => debug!(
                    attribute = name,
                    ?shape,
                    "Skipping structured attribute with unexpected shape"
                ),
            }
        }
    }

    fn structured_value(&self, shape: StructuredShape, sub_node: &Value) -> Option<AttributeValue> {
        match shape {
            StructuredShape::Object => sub_node
                .is_object()
                .then(|| FacebookObject::from_node(sub_node).into()),
            StructuredShape::ObjectList => sub_node
                .is_array()
                .then(|| FacebookObject::list_from_node(sub_node).into()),
            StructuredShape::StringList => sub_node.is_array().then(|| {
                json::elements(sub_node)
                    .filter_map(json::text_value)
                    .collect::<Vec<_>>()
                    .into()
            }),
            StructuredShape::EducationList => sub_node
                .is_array()
                .then(|| FacebookEducation::list_from_node(sub_node).into()),
            StructuredShape::WorkList => sub_node
                .is_array()
                .then(|| FacebookWork::list_from_node(sub_node, &self.work_dates).into()),
        }
    }
}

impl ProfileExtractor for FacebookProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn profile_url(&self) -> &str {
        PROFILE_URL
    }

    fn declarations(&self) -> &AttributeDeclarations {
        &self.declarations
    }

    fn extract_user_profile(&self, body: &str) -> Result<UserProfile, CommonError> {
        self.extract_facebook_profile(body).map(FacebookProfile::into_inner)
    }
}

#[cfg(all(test, feature = "unit_test"))]
mod unit_test {
    use super::*;
    use serde_json::json;

    fn provider() -> FacebookProvider {
        shared::setup_test!();
        FacebookProvider::new().unwrap()
    }

    fn extract(body: Value) -> FacebookProfile {
        provider()
            .extract_facebook_profile(&body.to_string())
            .unwrap()
    }

    #[test]
    fn test_declarations_cover_flat_attributes() {
        let provider = provider();
        let declarations = provider.declarations();
        assert_eq!(declarations.len(), 20);
        for name in RAW_ATTRIBUTES {
            assert!(matches!(declarations.converter(name), Some(None)));
        }
        assert!(matches!(declarations.converter(BIRTHDAY), Some(Some(_))));
        assert!(declarations.converter(EDUCATION).is_none());
    }

    #[test]
    fn test_flat_attributes() {
        let profile = extract(json!({
            "id": "100001",
            "name": "Jane Doe",
            "first_name": "Jane",
            "timezone": -5,
            "verified": true,
            "gender": "female",
            "locale": "en_US",
            "birthday": "08/15/1985",
            "updated_time": "2012-03-04T10:20:30+0000",
            "relationship_status": "It's complicated"
        }));

        assert_eq!(profile.id(), Some("100001"));
        assert_eq!(profile.name(), Some("Jane Doe"));
        assert_eq!(profile.first_name(), Some("Jane"));
        assert_eq!(profile.timezone(), Some(-5.0));
        assert_eq!(profile.verified(), Some(true));
        assert_eq!(profile.gender(), Some(Gender::Female));
        assert_eq!(profile.locale(), Some("en-US"));
        assert_eq!(
            profile.birthday().map(|d| d.to_string()).as_deref(),
            Some("1985-08-15T00:00:00+00:00")
        );
        assert_eq!(
            profile.updated_time().map(|d| d.to_string()).as_deref(),
            Some("2012-03-04T10:20:30+00:00")
        );
        assert_eq!(
            profile.relationship_status(),
            Some(FacebookRelationshipStatus::ItsComplicated)
        );
        assert_eq!(profile.email(), None);
        assert_eq!(profile.attributes().len(), 9);
    }

    #[test]
    fn test_unknown_gender_defaults_to_male() {
        let profile = extract(json!({ "id": "1", "gender": "custom" }));
        assert_eq!(profile.gender(), Some(Gender::Male));
    }

    #[test]
    fn test_unknown_relationship_status_is_omitted() {
        let profile = extract(json!({ "id": "1", "relationship_status": "Dating" }));
        assert_eq!(profile.relationship_status(), None);
        assert!(profile.attribute(RELATIONSHIP_STATUS).is_none());
    }

    #[test]
    fn test_structured_attributes() {
        let profile = extract(json!({
            "id": "1",
            "hometown": { "id": "110", "name": "Paris, France" },
            "languages": [{ "id": "1", "name": "French" }, { "id": "2", "name": "English" }],
            "interested_in": ["female", "male"],
            "favorite_teams": [],
            "work": [{ "employer": { "id": "9", "name": "Acme" }, "start_date": "2010-06" }]
        }));

        assert_eq!(
            profile.hometown().and_then(|h| h.name),
            Some("Paris, France".to_string())
        );
        let languages = profile.languages().unwrap();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[0].name.as_deref(), Some("French"));
        assert_eq!(
            profile.interested_in(),
            Some(vec!["female".to_string(), "male".to_string()])
        );
        assert_eq!(profile.favorite_teams(), Some(vec![]));
        let work = profile.work().unwrap();
        assert_eq!(work[0].employer.as_ref().and_then(|e| e.name.as_deref()), Some("Acme"));
        assert!(work[0].start_date.is_some());
        assert_eq!(profile.location(), None);
        assert_eq!(profile.significant_other(), None);
    }

    #[test]
    fn test_structured_attribute_with_wrong_shape_is_omitted() {
        let profile = extract(json!({
            "id": "1",
            "hometown": "Paris",
            "education": { "school": { "name": "not a list" } },
            "location": null
        }));
        assert!(profile.attribute(HOMETOWN).is_none());
        assert!(profile.attribute(EDUCATION).is_none());
        assert!(profile.attribute(LOCATION).is_none());
    }

    #[test]
    fn test_wrapped_array_body() {
        let profile = provider()
            .extract_facebook_profile(r#"[{ "id": "5", "name": "Wrapped" }]"#)
            .unwrap();
        assert_eq!(profile.id(), Some("5"));
        assert_eq!(profile.name(), Some("Wrapped"));
    }

    #[test]
    fn test_entry_node_absent_yields_empty_profile() {
        let provider = provider();
        for body in ["", "   ", "[]", "null", "\"text\"", "42"] {
            let profile = provider.extract_facebook_profile(body).unwrap();
            assert!(profile.is_empty(), "body {body:?} should give an empty profile");
        }
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        let result = provider().extract_facebook_profile("{ not json");
        assert!(matches!(result, Err(CommonError::InvalidResponse { .. })));
    }

    #[test]
    fn test_authorization_url_requires_config() {
        let provider = provider();
        let csrf_state = CsrfToken::new("state".to_string());
        assert!(provider.authorization_url(&csrf_state, None).is_err());

        let provider = provider.with_oauth_config(OauthProviderConfig {
            client_id: "app-id".to_string(),
            client_secret: "app-secret".to_string(),
            callback_url: "https://app.example.com/callback".to_string(),
            scopes: vec!["email".to_string()],
        });
        let url = provider.authorization_url(&csrf_state, None).unwrap();
        assert!(url.starts_with(AUTHORIZATION_ENDPOINT));
        assert!(url.contains("client_id=app-id"));
        assert!(url.contains("scope=email"));
        assert!(url.contains("state=state"));
        assert!(!url.contains("code_challenge"));

        let (pkce_challenge, _verifier) = PkceCodeChallenge::new_random_sha256();
        let url = provider
            .authorization_url(&csrf_state, Some(&pkce_challenge))
            .unwrap();
        assert!(url.contains("code_challenge_method=S256"));
    }

    #[test]
    fn test_from_env_reads_facebook_variables() {
        shared::setup_test!();
        unsafe {
            std::env::set_var("FACEBOOK_CLIENT_ID", "fb-app");
            std::env::set_var("FACEBOOK_CLIENT_SECRET", "fb-secret");
            std::env::set_var("FACEBOOK_CALLBACK_URL", "https://app.example.com/facebook");
            std::env::set_var("FACEBOOK_SCOPE", "email,user_birthday public_profile");
        }

        let provider = FacebookProvider::from_env().unwrap();
        let config = provider.oauth_config().unwrap();
        assert_eq!(config.client_id, "fb-app");
        assert_eq!(config.callback_url, "https://app.example.com/facebook");
        assert_eq!(config.scopes, vec!["email", "user_birthday", "public_profile"]);
        assert_eq!(provider.declarations().len(), 20);
    }
}
