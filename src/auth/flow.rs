//! Usage: PKCE OAuth2 sign-in flow: authorize URL, interactive callback, token exchange.

use crate::auth::config::OAuthConfig;
use crate::auth::pkce::{generate_pkce_pair, generate_state};
use crate::auth::session::{parse_callback_url, AuthCallback, InteractiveAuthSession};
use crate::auth::token_exchange::exchange_authorization_code;
use crate::shared::error::{AppError, AppResult};
use crate::shared::mutex_ext::MutexExt;
use crate::shared::security::{constant_time_eq, mask_token};
use reqwest::Url;
use std::sync::{Arc, Mutex};

const EXTRA_AUTHORIZE_PARAMS: &[(&str, &str)] = &[
    ("access_type", "offline"),
    ("prompt", "consent"),
    ("include_granted_scopes", "true"),
];

#[derive(Debug, Clone)]
struct PendingSignIn {
    code_verifier: String,
    state: String,
}

/// Runs the authorization-code exchange against the configured provider.
///
/// One sign-in attempt may be pending per instance; a new `sign_in` call
/// overwrites the previous pending state, and the state is discarded as soon
/// as the callback is consumed.
pub struct AuthenticationFlow {
    config: OAuthConfig,
    http: reqwest::Client,
    session: Arc<dyn InteractiveAuthSession>,
    pending: Mutex<Option<PendingSignIn>>,
}

impl AuthenticationFlow {
    pub fn new(config: OAuthConfig, session: Arc<dyn InteractiveAuthSession>) -> Self {
        Self::with_http_client(config, session, reqwest::Client::new())
    }

    pub fn with_http_client(
        config: OAuthConfig,
        session: Arc<dyn InteractiveAuthSession>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config,
            http,
            session,
            pending: Mutex::new(None),
        }
    }

    /// Run the full PKCE flow and return the bearer access token.
    pub async fn sign_in(&self) -> AppResult<String> {
        let pair = generate_pkce_pair();
        let state = generate_state();
        *self.pending.lock_or_recover() = Some(PendingSignIn {
            code_verifier: pair.code_verifier,
            state: state.clone(),
        });

        let authorize_url = self.build_authorize_url(&pair.code_challenge, &state)?;

        let callback = self
            .session
            .present(authorize_url, &self.config.callback_scheme)
            .await?;

        let Some(pending) = self.pending.lock_or_recover().take() else {
            // Another sign_in consumed or replaced this attempt mid-flight.
            return Err(AppError::AuthStateMismatch);
        };
        let code = validate_callback(&parse_callback_url(&callback), &pending.state)?;

        let token =
            exchange_authorization_code(&self.http, &self.config, &code, &pending.code_verifier)
                .await?;
        tracing::debug!(
            token = %mask_token(&token.access_token),
            "token exchange succeeded"
        );
        Ok(token.access_token)
    }

    fn build_authorize_url(&self, code_challenge: &str, state: &str) -> AppResult<Url> {
        let scope = self.config.scopes.join(" ");
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("state", state),
        ];
        params.extend_from_slice(EXTRA_AUTHORIZE_PARAMS);

        Url::parse_with_params(&self.config.auth_url, &params)
            .map_err(|e| AppError::InvalidRequest(format!("authorize url: {e}")))
    }
}

/// Integrity checks before the token exchange: state first (exact match, no
/// exchange on mismatch), then provider errors, then the code itself.
fn validate_callback(payload: &AuthCallback, expected_state: &str) -> AppResult<String> {
    let state = payload.state.as_deref().ok_or(AppError::AuthStateMismatch)?;
    if !constant_time_eq(state.as_bytes(), expected_state.as_bytes()) {
        return Err(AppError::AuthStateMismatch);
    }

    if let Some(error) = payload.error.as_deref() {
        if error == "access_denied" {
            return Err(AppError::AuthCancelled);
        }
        let detail = payload.error_description.as_deref().unwrap_or(error);
        return Err(AppError::InvalidRequest(format!(
            "authorization server returned {error}: {detail}"
        )));
    }

    payload.code.clone().ok_or_else(|| {
        AppError::InvalidRequest("authorization callback missing code".to_string())
    })
}
