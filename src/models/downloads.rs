// src/models/downloads.rs
// =============================================================================
// Download counts from api.npmjs.org, and the period syntax that API takes.
//
// Point:  GET /downloads/point/<period>/<package>  -> one total
// Range:  GET /downloads/range/<period>/<package>  -> one entry per day
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadStats {
    pub downloads: u64,
    /// First day counted, YYYY-MM-DD
    pub start: String,
    /// Last day counted, YYYY-MM-DD
    pub end: String,
    pub package: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadRangeStats {
    pub start: String,
    pub end: String,
    pub package: String,
    pub downloads: Vec<DailyDownloads>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyDownloads {
    pub day: String,
    pub downloads: u64,
}

impl DownloadRangeStats {
    pub fn total(&self) -> u64 {
        self.downloads.iter().map(|d| d.downloads).sum()
    }

    /// Day with the most downloads; the earliest one wins a tie
    pub fn peak(&self) -> Option<&DailyDownloads> {
        self.downloads
            .iter()
            .rev()
            .max_by_key(|d| d.downloads)
    }
}

/// Time window accepted by the downloads API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    LastDay,
    #[default]
    LastWeek,
    LastMonth,
    LastYear,
    Day(NaiveDate),
    /// Inclusive on both ends
    Range(NaiveDate, NaiveDate),
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidPeriod(s.to_string());

        match s {
            "last-day" => return Ok(Period::LastDay),
            "last-week" => return Ok(Period::LastWeek),
            "last-month" => return Ok(Period::LastMonth),
            "last-year" => return Ok(Period::LastYear),
            _ => {}
        }

        match s.split_once(':') {
            Some((start, end)) => {
                let start = parse_day(start).ok_or_else(invalid)?;
                let end = parse_day(end).ok_or_else(invalid)?;
                if start > end {
                    return Err(invalid());
                }
                Ok(Period::Range(start, end))
            }
            None => parse_day(s).map(Period::Day).ok_or_else(invalid),
        }
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    // chrono accepts "2024-1-5"; the API does not
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::LastDay => f.write_str("last-day"),
            Period::LastWeek => f.write_str("last-week"),
            Period::LastMonth => f.write_str("last-month"),
            Period::LastYear => f.write_str("last-year"),
            Period::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            Period::Range(start, end) => {
                write!(f, "{}:{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_periods() {
        assert_eq!("last-day".parse::<Period>().unwrap(), Period::LastDay);
        assert_eq!("last-week".parse::<Period>().unwrap(), Period::LastWeek);
        assert_eq!("last-month".parse::<Period>().unwrap(), Period::LastMonth);
        assert_eq!("last-year".parse::<Period>().unwrap(), Period::LastYear);
    }

    #[test]
    fn test_date_periods() {
        let day: Period = "2024-01-05".parse().unwrap();
        assert_eq!(day.to_string(), "2024-01-05");

        let range: Period = "2024-01-01:2024-01-31".parse().unwrap();
        assert_eq!(range.to_string(), "2024-01-01:2024-01-31");
    }

    #[test]
    fn test_invalid_periods() {
        let bad_periods = [
            "invalid-period",
            "",
            "last-decade",
            "2024-13-01",
            "2024-1-5",
            "2024-02-01:2024-01-01",
            "2024-01-01:",
        ];
        for bad in bad_periods {
            assert!(
                matches!(bad.parse::<Period>(), Err(Error::InvalidPeriod(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_range_totals() {
        let stats: DownloadRangeStats = serde_json::from_str(
            r#"{
                "start": "2024-01-01", "end": "2024-01-03", "package": "express",
                "downloads": [
                    {"day": "2024-01-01", "downloads": 10},
                    {"day": "2024-01-02", "downloads": 30},
                    {"day": "2024-01-03", "downloads": 30}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(stats.total(), 70);
        assert_eq!(stats.peak().unwrap().day, "2024-01-02");
    }
}
