//! Usage: Core auth + report pipeline behind the AdMob earnings dashboard.
//!
//! The host UI owns presentation (charts, pickers, widgets); this crate owns
//! the OAuth2 PKCE sign-in, the authenticated network-report fetch/parse
//! pipeline, and the dashboard state surface the UI renders from.

pub mod auth;
pub mod dashboard;
pub mod report;
pub mod shared;

pub use auth::config::OAuthConfig;
pub use auth::flow::AuthenticationFlow;
pub use auth::loopback::LoopbackAuthSession;
pub use auth::session::InteractiveAuthSession;
pub use auth::token_exchange::TokenResponse;
pub use auth::token_store::{MemoryTokenStore, TokenStore};
pub use dashboard::{DashboardState, EarningsDashboard};
pub use report::client::EarningsReportClient;
pub use report::filter::{DateRange, ReportFilter};
pub use report::models::Earning;
pub use report::wire::Account;
pub use shared::error::{AppError, AppResult};
