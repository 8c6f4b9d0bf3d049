use chrono::NaiveDate;
use meterbook_config::Config;
use meterbook_domain::DateRange;
use uuid::Uuid;

/// Formats values for display using the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency_symbol: String,
}

impl CliFormatters {
    pub fn new(config: &Config) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
        }
    }

    /// Two decimals, symbol first, sign before the symbol.
    pub fn money(&self, amount: f64) -> String {
        let rounded = meterbook_core::round_currency(amount);
        if rounded < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, -rounded)
        } else {
            format!("{}{:.2}", self.currency_symbol, rounded.abs())
        }
    }

    pub fn usage(&self, units: f64) -> String {
        format!("{:.2}", units)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    pub fn range(&self, range: &DateRange) -> String {
        format!("{} to {}", self.date(range.start), self.date(range.end))
    }
}

pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}
