use serde::{Deserialize, Serialize};

use crate::reading::UtilityKind;

pub const DEFAULT_WATER_BASE_FEE: f64 = 8.50;
pub const DEFAULT_WATER_UNIT_RATE: f64 = 18.00;
pub const DEFAULT_ELECTRIC_BASE_FEE: f64 = 38.22;
pub const DEFAULT_ELECTRIC_UNIT_RATE: f64 = 4.18;

/// Two-part rate for a single utility: a fixed fee plus a per-unit price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Tariff {
    pub base_fee: f64,
    pub unit_rate: f64,
}

/// The active tariffs for both utilities. There is no rate history, so a
/// change re-prices every period queried afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TariffSettings {
    #[serde(default = "TariffSettings::default_water_base_fee")]
    pub water_base_fee: f64,
    #[serde(default = "TariffSettings::default_water_unit_rate")]
    pub water_unit_rate: f64,
    #[serde(default = "TariffSettings::default_electric_base_fee")]
    pub electric_base_fee: f64,
    #[serde(default = "TariffSettings::default_electric_unit_rate")]
    pub electric_unit_rate: f64,
}

impl Default for TariffSettings {
    fn default() -> Self {
        Self {
            water_base_fee: DEFAULT_WATER_BASE_FEE,
            water_unit_rate: DEFAULT_WATER_UNIT_RATE,
            electric_base_fee: DEFAULT_ELECTRIC_BASE_FEE,
            electric_unit_rate: DEFAULT_ELECTRIC_UNIT_RATE,
        }
    }
}

impl TariffSettings {
    pub fn tariff(&self, kind: UtilityKind) -> Tariff {
        match kind {
            UtilityKind::Water => Tariff {
                base_fee: self.water_base_fee,
                unit_rate: self.water_unit_rate,
            },
            UtilityKind::Electric => Tariff {
                base_fee: self.electric_base_fee,
                unit_rate: self.electric_unit_rate,
            },
        }
    }

    pub fn set_tariff(&mut self, kind: UtilityKind, tariff: Tariff) {
        match kind {
            UtilityKind::Water => {
                self.water_base_fee = tariff.base_fee;
                self.water_unit_rate = tariff.unit_rate;
            }
            UtilityKind::Electric => {
                self.electric_base_fee = tariff.base_fee;
                self.electric_unit_rate = tariff.unit_rate;
            }
        }
    }

    /// Sum of both base fees, i.e. what a customer owes with no consumption.
    pub fn total_base_fee(&self) -> f64 {
        self.water_base_fee + self.electric_base_fee
    }

    fn default_water_base_fee() -> f64 {
        DEFAULT_WATER_BASE_FEE
    }

    fn default_water_unit_rate() -> f64 {
        DEFAULT_WATER_UNIT_RATE
    }

    fn default_electric_base_fee() -> f64 {
        DEFAULT_ELECTRIC_BASE_FEE
    }

    fn default_electric_unit_rate() -> f64 {
        DEFAULT_ELECTRIC_UNIT_RATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let settings: TariffSettings =
            serde_json::from_str(r#"{"waterUnitRate": 20.0}"#).expect("parse settings");
        assert_eq!(settings.water_unit_rate, 20.0);
        assert_eq!(settings.water_base_fee, DEFAULT_WATER_BASE_FEE);
        assert_eq!(settings.electric_unit_rate, DEFAULT_ELECTRIC_UNIT_RATE);
    }

    #[test]
    fn set_tariff_updates_only_one_utility() {
        let mut settings = TariffSettings::default();
        settings.set_tariff(
            UtilityKind::Electric,
            Tariff {
                base_fee: 40.0,
                unit_rate: 5.0,
            },
        );
        assert_eq!(settings.tariff(UtilityKind::Electric).unit_rate, 5.0);
        assert_eq!(settings.tariff(UtilityKind::Water).base_fee, DEFAULT_WATER_BASE_FEE);
    }
}
