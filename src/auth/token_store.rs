//! Usage: Injectable access-token storage (single in-memory token by default).

use crate::shared::mutex_ext::MutexExt;
use std::sync::Mutex;

/// Seam for credential storage, so persistent or refreshable stores can be
/// dropped in later without touching the report-fetch logic.
pub trait TokenStore: Send + Sync {
    fn store(&self, access_token: &str);
    fn access_token(&self) -> Option<String>;
    fn clear(&self);
}

/// Holds at most one bearer token, discarded with the process.
#[derive(Default)]
pub struct MemoryTokenStore(Mutex<Option<String>>);

impl TokenStore for MemoryTokenStore {
    fn store(&self, access_token: &str) {
        *self.0.lock_or_recover() = Some(access_token.to_string());
    }

    fn access_token(&self) -> Option<String> {
        self.0.lock_or_recover().clone()
    }

    fn clear(&self) {
        *self.0.lock_or_recover() = None;
    }
}
