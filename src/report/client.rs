//! Usage: Authenticated AdMob accounts listing and network-report fetch.

use crate::auth::flow::AuthenticationFlow;
use crate::auth::token_store::TokenStore;
use crate::report::filter::ReportFilter;
use crate::report::models::Earning;
use crate::report::parse::parse_report_rows;
use crate::report::wire::{
    Account, AccountsListResponse, GenerateReportRequest, GenerateReportResponse, ReportSpec,
};
use crate::shared::error::{AppError, AppResult};
use chrono::Utc;
use std::sync::Arc;

pub(crate) const ADMOB_API_BASE_URL: &str = "https://admob.googleapis.com/v1";

pub struct EarningsReportClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthenticationFlow,
    tokens: Arc<dyn TokenStore>,
}

impl EarningsReportClient {
    pub fn new(auth: AuthenticationFlow, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_base_url(auth, tokens, ADMOB_API_BASE_URL)
    }

    /// Point the client at a different API origin (tests, staging).
    pub fn with_base_url(
        auth: AuthenticationFlow,
        tokens: Arc<dyn TokenStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            auth,
            tokens,
        }
    }

    /// Fresh interactive sign-in, then select the first listed account.
    pub async fn connect(&self) -> AppResult<Account> {
        let token = self.auth.sign_in().await?;
        self.tokens.store(&token);

        let accounts = self.list_accounts(&token).await?;
        accounts.into_iter().next().ok_or(AppError::NoAccounts)
    }

    /// Earnings for `filter`, broken down by day, app and ad unit.
    ///
    /// An empty `account_id` yields an empty result without touching the
    /// network; a missing token is an error.
    pub async fn fetch_earnings(
        &self,
        filter: ReportFilter,
        account_id: &str,
    ) -> AppResult<(Vec<Earning>, Option<String>)> {
        if account_id.trim().is_empty() {
            return Ok((Vec::new(), None));
        }
        let token = self.tokens.access_token().ok_or(AppError::NotAuthorized)?;

        let now = Utc::now();
        let request = GenerateReportRequest {
            report_spec: ReportSpec::earnings_for(filter.date_range(now.date_naive())),
        };
        let url = format!("{}/{}/networkReport:generate", self.base_url, account_id);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("report request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("report response read failed: {e}")))?;
        if !status.is_success() {
            return Err(AppError::api(status.as_u16(), &body));
        }

        let report: GenerateReportResponse = serde_json::from_str(&body)?;
        let parsed = parse_report_rows(&report.report_rows, now);
        tracing::debug!(
            rows = report.report_rows.len(),
            earnings = parsed.earnings.len(),
            "decoded network report"
        );
        Ok((parsed.earnings, parsed.currency_code))
    }

    async fn list_accounts(&self, token: &str) -> AppResult<Vec<Account>> {
        let url = format!("{}/accounts", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("accounts request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("accounts response read failed: {e}")))?;
        if !status.is_success() {
            return Err(AppError::api(status.as_u16(), &body));
        }

        let list: AccountsListResponse = serde_json::from_str(&body)?;
        if list.accounts.is_empty() {
            return Err(AppError::NoAccounts);
        }
        Ok(list.accounts)
    }
}
