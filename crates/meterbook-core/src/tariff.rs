//! Two-part tariff pricing.

use meterbook_domain::Tariff;

/// Prices `usage` as `base_fee + usage * unit_rate`.
///
/// `usage` is expected to be non-negative (as returned by
/// [`crate::usage_for_period`]); the formula does not clamp it. No rounding
/// is applied here.
pub fn cost(usage: f64, base_fee: f64, unit_rate: f64) -> f64 {
    base_fee + usage * unit_rate
}

/// Extension for pricing directly from a [`Tariff`].
pub trait TariffExt {
    fn cost(&self, usage: f64) -> f64;
}

impl TariffExt for Tariff {
    fn cost(&self, usage: f64) -> f64 {
        cost(usage, self.base_fee, self.unit_rate)
    }
}

/// Rounds a monetary amount to two decimals for display.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
