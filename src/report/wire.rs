//! Usage: Wire-level request/response types for the AdMob network-report API.

use crate::report::filter::DateRange;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub(crate) const DIMENSION_DATE: &str = "DATE";
pub(crate) const DIMENSION_APP: &str = "APP";
pub(crate) const DIMENSION_AD_UNIT: &str = "AD_UNIT";
pub(crate) const METRIC_ESTIMATED_EARNINGS: &str = "ESTIMATED_EARNINGS";

/// AdMob publisher account, as returned by the accounts list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Opaque resource name, e.g. `accounts/pub-1234567890123456`.
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AccountsListResponse {
    #[serde(default)]
    pub(crate) accounts: Vec<Account>,
}

/// The API takes dates as year/month/day integers, not ISO strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct ReportDate {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) day: u32,
}

impl From<NaiveDate> for ReportDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportDateRange {
    pub(crate) start_date: ReportDate,
    pub(crate) end_date: ReportDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportSpec {
    pub(crate) date_range: ReportDateRange,
    pub(crate) dimensions: Vec<&'static str>,
    pub(crate) metrics: Vec<&'static str>,
}

impl ReportSpec {
    /// Earnings breakdown query over `range`, converting the local half-open
    /// range to the API's inclusive end date.
    pub(crate) fn earnings_for(range: DateRange) -> Self {
        Self {
            date_range: ReportDateRange {
                start_date: range.start.into(),
                end_date: range.inclusive_end().into(),
            },
            dimensions: vec![DIMENSION_DATE, DIMENSION_APP, DIMENSION_AD_UNIT],
            metrics: vec![METRIC_ESTIMATED_EARNINGS],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateReportRequest {
    pub(crate) report_spec: ReportSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DimensionValue {
    #[serde(default)]
    pub(crate) value: Option<String>,
    #[serde(default)]
    pub(crate) display_label: Option<String>,
}

/// Earnings arrive either as a direct decimal or as a micros integer string;
/// the currency code rides on the metric, not the row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetricValue {
    #[serde(default)]
    pub(crate) double_value: Option<f64>,
    #[serde(default)]
    pub(crate) micros_value: Option<String>,
    #[serde(default)]
    pub(crate) currency_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportRow {
    #[serde(default)]
    pub(crate) dimension_values: HashMap<String, DimensionValue>,
    #[serde(default)]
    pub(crate) metric_values: HashMap<String, MetricValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateReportResponse {
    #[serde(default)]
    pub(crate) report_rows: Vec<ReportRow>,
}
