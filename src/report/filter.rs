//! Usage: Time filters and their calendar-aligned date ranges.

use chrono::{Datelike, Duration, NaiveDate};

/// Preset reporting windows offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFilter {
    Day,
    Week,
    Month,
    Year,
}

/// Half-open interval of calendar days: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportFilter {
    /// The calendar-aligned interval containing `today`. Weeks start on
    /// Monday.
    pub fn date_range(self, today: NaiveDate) -> DateRange {
        match self {
            ReportFilter::Day => DateRange {
                start: today,
                end: today + Duration::days(1),
            },
            ReportFilter::Week => {
                let start =
                    today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                DateRange {
                    start,
                    end: start + Duration::days(7),
                }
            }
            ReportFilter::Month => {
                let start = today.with_day(1).unwrap_or(today);
                DateRange {
                    start,
                    end: next_month(start),
                }
            }
            ReportFilter::Year => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                DateRange {
                    start,
                    end: NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(start),
                }
            }
        }
    }
}

impl DateRange {
    /// The report API treats the end date as inclusive; convert the local
    /// half-open bound, clamping so the end never precedes the start.
    pub(crate) fn inclusive_end(&self) -> NaiveDate {
        let adjusted = self.end - Duration::days(1);
        if adjusted < self.start {
            self.start
        } else {
            adjusted
        }
    }
}

fn next_month(first_of_month: NaiveDate) -> NaiveDate {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first_of_month)
}
