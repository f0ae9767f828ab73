//! Usage: OAuth endpoint configuration for the Google / AdMob provider.

use crate::shared::error::{AppError, AppResult};

pub(crate) const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub(crate) const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub(crate) const ADMOB_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/admob.readonly";

const GOOGLE_CLIENT_ID_SUFFIX: &str = ".apps.googleusercontent.com";

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub auth_url: String,
    pub token_url: String,
    /// Private app-reserved redirect, e.g.
    /// `com.googleusercontent.apps.1234-abcd:/oauthredirect`. A custom scheme
    /// keeps the authorization code out of reach of other apps.
    pub redirect_uri: String,
    /// Scheme half of `redirect_uri`; the interactive session filters
    /// callbacks on it.
    pub callback_scheme: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Google defaults for an AdMob read-only client. The redirect scheme is
    /// the reversed client id, which Google reserves to the owning app.
    pub fn google_admob(client_id: impl Into<String>) -> AppResult<Self> {
        let client_id = client_id.into();
        let scheme = reversed_client_id(&client_id).ok_or_else(|| {
            AppError::InvalidRequest(format!(
                "client id does not end in {GOOGLE_CLIENT_ID_SUFFIX}"
            ))
        })?;

        Ok(Self {
            redirect_uri: format!("{scheme}:/oauthredirect"),
            callback_scheme: scheme,
            client_id,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            scopes: vec![ADMOB_READONLY_SCOPE.to_string()],
        })
    }
}

/// `NUM-HASH.apps.googleusercontent.com` -> `com.googleusercontent.apps.NUM-HASH`.
pub(crate) fn reversed_client_id(client_id: &str) -> Option<String> {
    let prefix = client_id.trim().strip_suffix(GOOGLE_CLIENT_ID_SUFFIX)?;
    if prefix.is_empty() {
        return None;
    }
    Some(format!("com.googleusercontent.apps.{prefix}"))
}
