//! Usage: Interactive authentication session capability and callback URL parsing.

use crate::shared::error::AppResult;
use reqwest::Url;
use std::future::Future;
use std::pin::Pin;

/// Host-provided interactive browser/webview capability.
///
/// The trait is object-safe so hosts can hand the flow a boxed
/// implementation (web popup, native webview, system browser).
/// `present` opens `authorize_url`, suspends until the provider redirects
/// back on `callback_scheme`, and resolves with the full callback URL.
/// User dismissal resolves with `AppError::AuthCancelled`, never a hang.
pub trait InteractiveAuthSession: Send + Sync {
    fn present(
        &self,
        authorize_url: Url,
        callback_scheme: &str,
    ) -> Pin<Box<dyn Future<Output = AppResult<Url>> + Send + '_>>;
}

/// Query parameters of an authorization callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AuthCallback {
    pub(crate) code: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) error_description: Option<String>,
}

pub(crate) fn parse_callback_url(url: &Url) -> AuthCallback {
    let mut payload = AuthCallback::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => payload.code = Some(value.to_string()),
            "state" => payload.state = Some(value.to_string()),
            "error" => payload.error = Some(value.to_string()),
            "error_description" => payload.error_description = Some(value.to_string()),
            _ => {}
        }
    }
    payload
}
