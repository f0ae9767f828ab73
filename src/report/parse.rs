//! Usage: Decode network-report rows into normalized earnings.

use crate::report::models::Earning;
use crate::report::wire::{
    MetricValue, ReportRow, DIMENSION_AD_UNIT, DIMENSION_APP, DIMENSION_DATE,
    METRIC_ESTIMATED_EARNINGS,
};
use chrono::{DateTime, NaiveDate, Utc};

pub(crate) const APP_PLACEHOLDER: &str = "Unknown App";
pub(crate) const AD_UNIT_PLACEHOLDER: &str = "Ad Unit";

const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";
const MICROS_PER_UNIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedReport {
    pub(crate) earnings: Vec<Earning>,
    pub(crate) currency_code: Option<String>,
}

/// Convert report rows, skipping rows without the earnings metric and
/// latching the currency code from the first row that carries one. Rows are
/// assumed to share one currency per account.
pub(crate) fn parse_report_rows(rows: &[ReportRow], now: DateTime<Utc>) -> ParsedReport {
    let mut parsed = ParsedReport::default();
    for row in rows {
        let Some(metric) = row.metric_values.get(METRIC_ESTIMATED_EARNINGS) else {
            continue;
        };
        let Some(amount) = metric_amount(metric) else {
            continue;
        };

        if parsed.currency_code.is_none() {
            parsed.currency_code = metric
                .currency_code
                .clone()
                .filter(|code| !code.is_empty());
        }

        parsed.earnings.push(Earning {
            date: parse_report_date(dimension_raw(row, DIMENSION_DATE), now),
            app_name: dimension_label(row, DIMENSION_APP, APP_PLACEHOLDER),
            ad_unit: dimension_label(row, DIMENSION_AD_UNIT, AD_UNIT_PLACEHOLDER),
            amount,
        });
    }
    parsed
}

fn metric_amount(metric: &MetricValue) -> Option<f64> {
    if let Some(value) = metric.double_value {
        return Some(value);
    }
    metric
        .micros_value
        .as_deref()
        .and_then(|micros| micros.trim().parse::<f64>().ok())
        .map(|micros| micros / MICROS_PER_UNIT)
}

/// Prefer the human-readable label, fall back to the raw value, then to the
/// fixed placeholder.
fn dimension_label(row: &ReportRow, name: &str, placeholder: &str) -> String {
    let Some(dimension) = row.dimension_values.get(name) else {
        return placeholder.to_string();
    };
    dimension
        .display_label
        .as_deref()
        .filter(|label| !label.is_empty())
        .or_else(|| dimension.value.as_deref().filter(|value| !value.is_empty()))
        .unwrap_or(placeholder)
        .to_string()
}

fn dimension_raw<'a>(row: &'a ReportRow, name: &str) -> Option<&'a str> {
    row.dimension_values
        .get(name)
        .and_then(|dimension| dimension.value.as_deref())
}

/// `yyyy-MM-dd`, midnight UTC. A missing or malformed value falls back to
/// `now` so the row is never dropped.
// TODO: stop stamping malformed report dates with "now" and surface them;
// kept as-is for compatibility with existing dashboards.
fn parse_report_date(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    value
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), REPORT_DATE_FORMAT).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .unwrap_or(now)
}
