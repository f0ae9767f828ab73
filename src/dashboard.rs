//! Usage: Collaborator surface for the host UI: dashboard state, aggregates, guarded loads.

use crate::report::client::EarningsReportClient;
use crate::report::filter::ReportFilter;
use crate::report::models::Earning;
use crate::report::wire::Account;
use std::collections::BTreeMap;
use tokio::sync::watch;

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub earnings: Vec<Earning>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub currency_code: Option<String>,
    pub account: Option<Account>,
}

impl DashboardState {
    /// Sum of all loaded earnings.
    pub fn total(&self) -> f64 {
        self.earnings.iter().map(|earning| earning.amount).sum()
    }

    /// Earnings summed per app, ascending by app name.
    pub fn grouped_by_app(&self) -> Vec<(String, f64)> {
        group_amounts(
            self.earnings
                .iter()
                .map(|earning| (earning.app_name.as_str(), earning.amount)),
        )
    }

    /// Earnings summed per ad unit, ascending by ad-unit name.
    pub fn grouped_by_ad_unit(&self) -> Vec<(String, f64)> {
        group_amounts(
            self.earnings
                .iter()
                .map(|earning| (earning.ad_unit.as_str(), earning.amount)),
        )
    }
}

fn group_amounts<'a>(items: impl Iterator<Item = (&'a str, f64)>) -> Vec<(String, f64)> {
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for (key, amount) in items {
        *groups.entry(key.to_string()).or_insert(0.0) += amount;
    }
    groups.into_iter().collect()
}

/// One dashboard per signed-in surface. All state mutation funnels through
/// the loading flag, so overlapping `connect`/`load_earnings` calls become
/// no-ops instead of racing. Every failure is absorbed into `error_message`;
/// nothing propagates to the host, and nothing retries on its own.
pub struct EarningsDashboard {
    client: EarningsReportClient,
    state: watch::Sender<DashboardState>,
}

impl EarningsDashboard {
    pub fn new(client: EarningsReportClient) -> Self {
        Self {
            client,
            state: watch::Sender::new(DashboardState::default()),
        }
    }

    /// Current snapshot for polling hosts.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Change feed for reactive hosts.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Interactive sign-in plus account selection. No-op while another load
    /// is in flight.
    pub async fn connect(&self) {
        if !self.begin_load() {
            return;
        }

        let result = self.client.connect().await;
        self.state.send_modify(|state| {
            match result {
                Ok(account) => state.account = Some(account),
                Err(err) => {
                    tracing::warn!("connect failed: {err}");
                    state.error_message = Some(err.to_string());
                }
            }
            state.is_loading = false;
        });
    }

    /// Fetch earnings for the connected account. No-op while another load is
    /// in flight; an unconnected dashboard simply clears the list.
    pub async fn load_earnings(&self, filter: ReportFilter) {
        if !self.begin_load() {
            return;
        }

        let account_id = self
            .state
            .borrow()
            .account
            .as_ref()
            .map(|account| account.name.clone())
            .unwrap_or_default();

        let result = self.client.fetch_earnings(filter, &account_id).await;
        self.state.send_modify(|state| {
            match result {
                Ok((earnings, currency_code)) => {
                    state.earnings = earnings;
                    state.currency_code = currency_code;
                }
                Err(err) => {
                    tracing::warn!("earnings load failed: {err}");
                    state.error_message = Some(err.to_string());
                }
            }
            state.is_loading = false;
        });
    }

    /// Atomically claim the loading flag; a `false` return means another
    /// load owns it and the caller must back off.
    fn begin_load(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.is_loading = true;
            state.error_message = None;
            true
        })
    }
}
