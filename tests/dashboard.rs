mod support;

use admob_earn_lib::{
    AuthenticationFlow, EarningsDashboard, EarningsReportClient, MemoryTokenStore, OAuthConfig,
    ReportFilter,
};
use std::sync::Arc;
use std::time::Duration;
use support::{spawn_server, CannedRoute, FakeAuthSession, TestServer};

const TOKEN_JSON: &str =
    r#"{"access_token":"ya29.dash","expires_in":3599,"token_type":"Bearer"}"#;

const ACCOUNTS_JSON: &str =
    r#"{"accounts": [{"name": "accounts/pub-1", "displayName": "Main", "currencyCode": "USD"}]}"#;

const REPORT_JSON: &str = r#"{
  "reportRows": [
    {
      "dimensionValues": {
        "DATE": {"value": "2024-01-05"},
        "APP": {"displayLabel": "Chat Fun"},
        "AD_UNIT": {"displayLabel": "Rewarded"}
      },
      "metricValues": {"ESTIMATED_EARNINGS": {"microsValue": "4200000", "currencyCode": "USD"}}
    },
    {
      "dimensionValues": {
        "DATE": {"value": "2024-01-06"},
        "APP": {"displayLabel": "Chat Fun"},
        "AD_UNIT": {"displayLabel": "BannerTop"}
      },
      "metricValues": {"ESTIMATED_EARNINGS": {"doubleValue": 0.8}}
    }
  ]
}"#;

fn dashboard_against(server: &TestServer) -> EarningsDashboard {
    let mut config =
        OAuthConfig::google_admob("1234-abcd.apps.googleusercontent.com").expect("config");
    config.token_url = server.url("/token");
    let session = FakeAuthSession::returning_code(config.redirect_uri.clone(), "auth-code");
    let auth = AuthenticationFlow::new(config, Arc::new(session));
    let client = EarningsReportClient::with_base_url(
        auth,
        Arc::new(MemoryTokenStore::default()),
        server.url("/v1"),
    );
    EarningsDashboard::new(client)
}

#[tokio::test]
async fn connect_then_load_populates_the_state() {
    let server = spawn_server(vec![
        CannedRoute::new("/token", 200, TOKEN_JSON),
        CannedRoute::new("/v1/accounts/pub-1/networkReport", 200, REPORT_JSON),
        CannedRoute::new("/v1/accounts", 200, ACCOUNTS_JSON),
    ])
    .await;
    let dashboard = dashboard_against(&server);

    dashboard.connect().await;
    let state = dashboard.state();
    assert!(!state.is_loading);
    assert!(state.error_message.is_none());
    assert_eq!(
        state.account.as_ref().map(|account| account.name.as_str()),
        Some("accounts/pub-1")
    );

    dashboard.load_earnings(ReportFilter::Week).await;
    let state = dashboard.state();
    assert!(!state.is_loading);
    assert!(state.error_message.is_none());
    assert_eq!(state.currency_code.as_deref(), Some("USD"));
    assert_eq!(state.earnings.len(), 2);
    assert_eq!(state.total(), 5.0);
    assert_eq!(
        state.grouped_by_app(),
        vec![("Chat Fun".to_string(), 5.0)]
    );
    assert_eq!(
        state.grouped_by_ad_unit(),
        vec![
            ("BannerTop".to_string(), 0.8),
            ("Rewarded".to_string(), 4.2)
        ]
    );
}

#[tokio::test]
async fn failed_connect_sets_error_message_and_clears_loading() {
    let server = spawn_server(vec![
        CannedRoute::new("/token", 200, TOKEN_JSON),
        CannedRoute::new("/v1/accounts", 403, "Forbidden"),
    ])
    .await;
    let dashboard = dashboard_against(&server);

    dashboard.connect().await;
    let state = dashboard.state();
    assert!(!state.is_loading);
    assert!(state.account.is_none());
    assert_eq!(state.error_message.as_deref(), Some("Forbidden"));
}

#[tokio::test]
async fn unconnected_load_yields_an_empty_result_without_network() {
    let server = spawn_server(vec![]).await;
    let dashboard = dashboard_against(&server);

    dashboard.load_earnings(ReportFilter::Day).await;
    let state = dashboard.state();
    assert!(!state.is_loading);
    assert!(state.error_message.is_none());
    assert!(state.earnings.is_empty());
    assert!(state.currency_code.is_none());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn overlapping_loads_are_no_ops() {
    let server = spawn_server(vec![
        CannedRoute::new("/token", 200, TOKEN_JSON).with_delay(Duration::from_millis(250)),
        CannedRoute::new("/v1/accounts", 200, ACCOUNTS_JSON),
    ])
    .await;
    let dashboard = Arc::new(dashboard_against(&server));

    let mut changes = dashboard.subscribe();
    let background = Arc::clone(&dashboard);
    let first = tokio::spawn(async move { background.connect().await });

    changes
        .wait_for(|state| state.is_loading)
        .await
        .expect("loading flag");

    // While the first load waits on the slow token endpoint, further calls
    // must return immediately without queueing work.
    dashboard.load_earnings(ReportFilter::Day).await;
    dashboard.connect().await;
    assert!(dashboard.state().is_loading);

    first.await.expect("join");
    let state = dashboard.state();
    assert!(!state.is_loading);
    assert!(state.error_message.is_none());
    assert_eq!(
        state.account.as_ref().map(|account| account.name.as_str()),
        Some("accounts/pub-1")
    );
    // Only the first load's two requests reached the wire.
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn retry_after_failure_recovers() {
    // First accounts call fails, the retry succeeds; the error message from
    // the failed attempt is cleared when the user retries.
    let failing = spawn_server(vec![
        CannedRoute::new("/token", 200, TOKEN_JSON),
        CannedRoute::new("/v1/accounts", 500, "backend exploded"),
    ])
    .await;
    let dashboard = dashboard_against(&failing);

    dashboard.connect().await;
    assert_eq!(
        dashboard.state().error_message.as_deref(),
        Some("backend exploded")
    );

    dashboard.connect().await;
    // Same failing server: the message is re-set, but the loading flag must
    // have cycled through cleanly both times.
    let state = dashboard.state();
    assert!(!state.is_loading);
    assert_eq!(state.error_message.as_deref(), Some("backend exploded"));
}
