//! Resolves period selectors into concrete date ranges.

use chrono::{Datelike, NaiveDate};

use meterbook_domain::{DateRange, PeriodKind};

/// Maps a period selector to a concrete inclusive range relative to `today`.
///
/// The multi-month selectors reach back N months *and* include the current
/// month, so `LastThreeMonths` covers four calendar months and
/// `LastSixMonths` covers seven. `Custom` uses the supplied bounds and falls
/// back to `today` for any that are missing.
pub fn resolve_period(
    kind: PeriodKind,
    today: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> DateRange {
    match kind {
        PeriodKind::CurrentMonth => DateRange::new(month_start(today, 0), month_end(today, 0)),
        PeriodKind::LastMonth => DateRange::new(month_start(today, -1), month_end(today, -1)),
        PeriodKind::LastThreeMonths => {
            DateRange::new(month_start(today, -3), month_end(today, 0))
        }
        PeriodKind::LastSixMonths => DateRange::new(month_start(today, -6), month_end(today, 0)),
        PeriodKind::Custom => DateRange::new(
            custom_start.unwrap_or(today),
            custom_end.unwrap_or(today),
        ),
    }
}

/// Same as [`resolve_period`] but takes the raw selector key; unknown keys
/// resolve as the current month.
pub fn resolve_period_key(
    key: &str,
    today: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> DateRange {
    resolve_period(PeriodKind::from_key(key), today, custom_start, custom_end)
}

/// First day of the month `offset` months away from `reference`.
pub fn month_start(reference: NaiveDate, offset: i32) -> NaiveDate {
    let index = reference.year() * 12 + reference.month0() as i32 + offset;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(reference)
}

/// Last day of the month `offset` months away from `reference`.
pub fn month_end(reference: NaiveDate, offset: i32) -> NaiveDate {
    month_start(reference, offset + 1)
        .pred_opt()
        .unwrap_or(reference)
}
