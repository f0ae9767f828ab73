//! Usage: Unified application error model for the auth flow and report client.

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A report was requested before `connect` stored an access token.
    #[error("not authorized: no access token, connect first")]
    NotAuthorized,

    /// The authenticated Google user has no AdMob accounts.
    #[error("no AdMob accounts found for this user")]
    NoAccounts,

    /// Malformed URL or configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Non-2xx HTTP response. Displays the trimmed response body when
    /// present, otherwise a generic `status N` text.
    #[error("{}", api_error_text(.status, .message))]
    Api { status: u16, message: String },

    /// Malformed JSON or shape mismatch in a response body.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The user dismissed the interactive authentication session.
    #[error("sign-in cancelled")]
    AuthCancelled,

    /// The authorization callback failed its integrity check.
    #[error("authorization callback state mismatch")]
    AuthStateMismatch,

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),
}

impl AppError {
    /// Build an `Api` error from a status code and the raw response body.
    pub fn api(status: u16, body: &str) -> Self {
        AppError::Api {
            status,
            message: body.trim().to_string(),
        }
    }
}

fn api_error_text(status: &u16, message: &str) -> String {
    if message.is_empty() {
        format!("status {status}")
    } else {
        message.to_string()
    }
}
