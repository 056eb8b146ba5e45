//! OAuth2 client configuration and authorization URL building.
//!
//! Only the pieces a provider needs to send the user to its login page live
//! here. Token exchange and the profile request itself belong to the
//! transport layer, which hands the profile response body back to a
//! [`super::ProfileExtractor`].

use oauth2::{AuthUrl, ClientId, CsrfToken, PkceCodeChallenge, RedirectUrl, Scope, TokenUrl};
use serde::{Deserialize, Serialize};
use shared::env::{optional_var, required_var};
use shared::error::CommonError;

/// Endpoints of one provider's authorization server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthEndpoints {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
}

/// Client registration with a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthProviderConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub callback_url: String,
    /// Empty means the provider's default scope
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl OauthProviderConfig {
    /// Read `{PREFIX}_CLIENT_ID`, `{PREFIX}_CLIENT_SECRET`,
    /// `{PREFIX}_CALLBACK_URL` and the optional space or comma separated
    /// `{PREFIX}_SCOPE`.
    pub fn from_env(prefix: &str) -> Result<Self, CommonError> {
        let scopes = optional_var(&format!("{prefix}_SCOPE"))
            .map(|raw| parse_scopes(&raw))
            .unwrap_or_default();

        let config = Self {
            client_id: required_var(&format!("{prefix}_CLIENT_ID"))?,
            client_secret: required_var(&format!("{prefix}_CLIENT_SECRET"))?,
            callback_url: required_var(&format!("{prefix}_CALLBACK_URL"))?,
            scopes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CommonError> {
        if self.client_id.trim().is_empty() {
            return Err(CommonError::InvalidRequest {
                msg: "OAuth client id must not be blank".to_string(),
                source: None,
            });
        }
        RedirectUrl::new(self.callback_url.clone()).map_err(|e| CommonError::InvalidRequest {
            msg: format!("Invalid callback URL: {e}"),
            source: None,
        })?;
        Ok(())
    }
}

/// Split a scope string on whitespace and commas, dropping blanks.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parameters for building an authorization URL.
pub struct AuthorizationUrlParams<'a> {
    pub endpoints: &'a OauthEndpoints,
    pub config: &'a OauthProviderConfig,
    pub csrf_state: &'a CsrfToken,
    pub pkce_challenge: Option<&'a PkceCodeChallenge>,
}

/// Build the URL the user is redirected to for login.
pub fn build_authorization_url(params: AuthorizationUrlParams<'_>) -> Result<String, CommonError> {
    let auth_url = AuthUrl::new(params.endpoints.authorization_endpoint.clone()).map_err(|e| {
        CommonError::InvalidRequest {
            msg: format!("Invalid authorization endpoint: {e}"),
            source: None,
        }
    })?;

    let token_url = TokenUrl::new(params.endpoints.token_endpoint.clone()).map_err(|e| {
        CommonError::InvalidRequest {
            msg: format!("Invalid token endpoint: {e}"),
            source: None,
        }
    })?;

    let redirect_url = RedirectUrl::new(params.config.callback_url.clone()).map_err(|e| {
        CommonError::InvalidRequest {
            msg: format!("Invalid redirect URI: {e}"),
            source: None,
        }
    })?;

    let client = oauth2::basic::BasicClient::new(ClientId::new(params.config.client_id.clone()))
        .set_auth_uri(auth_url)
        .set_token_uri(token_url)
        .set_redirect_uri(redirect_url);

    let csrf_for_closure = params.csrf_state.clone();
    let mut auth_request = client.authorize_url(move || csrf_for_closure.clone());

    for scope in &params.config.scopes {
        auth_request = auth_request.add_scope(Scope::new(scope.clone()));
    }

    if let Some(challenge) = params.pkce_challenge {
        auth_request = auth_request.set_pkce_challenge(challenge.clone());
    }

    let (url, _) = auth_request.url();

    Ok(url.to_string())
}
