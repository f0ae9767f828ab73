//! Usage: OAuth token endpoint helper (authorization_code grant).

use crate::auth::config::OAuthConfig;
use crate::shared::error::{AppError, AppResult};
use serde::Deserialize;

/// Token endpoint response, snake_case on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub token_type: String,
}

/// Swap the authorization code for a token set. The original verifier (not
/// the challenge) proves possession to the token endpoint.
pub(crate) async fn exchange_authorization_code(
    client: &reqwest::Client,
    config: &OAuthConfig,
    code: &str,
    code_verifier: &str,
) -> AppResult<TokenResponse> {
    let form = [
        ("client_id", config.client_id.as_str()),
        ("code", code),
        ("code_verifier", code_verifier),
        ("grant_type", "authorization_code"),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let response = client
        .post(&config.token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| AppError::Network(format!("token exchange request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("token response read failed: {e}")))?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "token endpoint rejected the exchange");
        return Err(AppError::api(status.as_u16(), &body));
    }

    let token: TokenResponse = serde_json::from_str(&body)?;
    Ok(token)
}
