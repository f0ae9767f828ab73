//! Usage: Normalized earning records produced by report-row decoding.

use chrono::{DateTime, Utc};

/// One decoded report row: a day's earnings for an app / ad-unit pair, in
/// the report's currency unit (not micros).
#[derive(Debug, Clone, PartialEq)]
pub struct Earning {
    pub date: DateTime<Utc>,
    pub app_name: String,
    pub ad_unit: String,
    pub amount: f64,
}
