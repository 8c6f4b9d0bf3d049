//! Query windows for usage calculations.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// A resolved reporting window. Both ends are inclusive.
///
/// `start <= end` is expected but not enforced; an inverted range simply
/// yields no usage.
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
/// Named period selectors offered to the user.
pub enum PeriodKind {
    #[default]
    CurrentMonth,
    LastMonth,
    #[serde(rename = "last_3_months")]
    LastThreeMonths,
    #[serde(rename = "last_6_months")]
    LastSixMonths,
    Custom,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 5] = [
        PeriodKind::CurrentMonth,
        PeriodKind::LastMonth,
        PeriodKind::LastThreeMonths,
        PeriodKind::LastSixMonths,
        PeriodKind::Custom,
    ];

    /// Parses a selector key. Unknown keys resolve to [`PeriodKind::CurrentMonth`].
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "current_month" => PeriodKind::CurrentMonth,
            "last_month" => PeriodKind::LastMonth,
            "last_3_months" => PeriodKind::LastThreeMonths,
            "last_6_months" => PeriodKind::LastSixMonths,
            "custom" => PeriodKind::Custom,
            _ => PeriodKind::CurrentMonth,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PeriodKind::CurrentMonth => "current_month",
            PeriodKind::LastMonth => "last_month",
            PeriodKind::LastThreeMonths => "last_3_months",
            PeriodKind::LastSixMonths => "last_6_months",
            PeriodKind::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::CurrentMonth => "Current month",
            PeriodKind::LastMonth => "Last month",
            PeriodKind::LastThreeMonths => "Last 3 months",
            PeriodKind::LastSixMonths => "Last 6 months",
            PeriodKind::Custom => "Custom range",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_fall_back_to_current_month() {
        assert_eq!(PeriodKind::from_key("last_3_months"), PeriodKind::LastThreeMonths);
        assert_eq!(PeriodKind::from_key("fortnight"), PeriodKind::CurrentMonth);
        assert_eq!(PeriodKind::from_key(""), PeriodKind::CurrentMonth);
    }

    #[test]
    fn serde_names_match_selector_keys() {
        for kind in PeriodKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.key()));
        }
    }

    #[test]
    fn range_contains_is_inclusive() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(!range.is_inverted());
    }
}
