//! Consumption over a date range from a date-ordered meter series.

use meterbook_domain::{DateRange, Reading};

/// Returns the consumption recorded by `readings` during `range`.
///
/// `readings` must be ordered by date (the store keeps every partition that
/// way). Usage is measured from the last reading at or before the range
/// start to the last reading at or before the range end. When no such pair
/// exists, or the meter went backwards between them, the readings that fall
/// inside the range are used instead and a negative delta there clamps to 0.
/// A decreasing anchor pair is never clamped directly.
///
/// Never fails: empty input, an inverted range, or too few readings all give 0.
pub fn usage_for_period(readings: &[Reading], range: &DateRange) -> f64 {
    if readings.is_empty() {
        return 0.0;
    }

    let start_anchor = last_on_or_before(readings, range.start);
    let end_anchor = last_on_or_before(readings, range.end);

    if let (Some(start), Some(end)) = (start_anchor, end_anchor) {
        if end.meter >= start.meter {
            return end.meter - start.meter;
        }
    }

    let mut inside = readings.iter().filter(|reading| range.contains(reading.date));
    match (inside.next(), inside.last()) {
        (Some(first), Some(last)) => (last.meter - first.meter).max(0.0),
        _ => 0.0,
    }
}

fn last_on_or_before(readings: &[Reading], boundary: chrono::NaiveDate) -> Option<&Reading> {
    readings.iter().rev().find(|reading| reading.date <= boundary)
}
