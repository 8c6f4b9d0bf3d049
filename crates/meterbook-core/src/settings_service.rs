use tracing::info;

use meterbook_domain::{MeterStore, Tariff, TariffSettings, UtilityKind};

use crate::CoreError;

/// Validated updates to the active tariffs.
pub struct SettingsService;

impl SettingsService {
    pub fn update(store: &mut MeterStore, settings: TariffSettings) -> Result<(), CoreError> {
        for kind in UtilityKind::ALL {
            Self::validate(kind, settings.tariff(kind))?;
        }
        store.settings = settings;
        store.touch();
        info!(?settings, "tariffs updated");
        Ok(())
    }

    pub fn set_tariff(
        store: &mut MeterStore,
        kind: UtilityKind,
        tariff: Tariff,
    ) -> Result<(), CoreError> {
        let mut settings = store.settings;
        settings.set_tariff(kind, tariff);
        Self::update(store, settings)
    }

    fn validate(kind: UtilityKind, tariff: Tariff) -> Result<(), CoreError> {
        for (field, value) in [("base fee", tariff.base_fee), ("unit rate", tariff.unit_rate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{} {} must be a non-negative number",
                    kind.key(),
                    field
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_rates_without_partial_update() {
        let mut store = MeterStore::new();
        let mut settings = TariffSettings::default();
        settings.water_base_fee = 10.0;
        settings.electric_unit_rate = -1.0;

        let err = SettingsService::update(&mut store, settings).expect_err("negative rate");
        assert!(
            matches!(err, CoreError::Validation(ref message) if message.contains("electric unit rate")),
            "unexpected error: {err:?}"
        );
        assert_eq!(store.settings, TariffSettings::default());
    }

    #[test]
    fn set_tariff_changes_one_utility() {
        let mut store = MeterStore::new();
        SettingsService::set_tariff(
            &mut store,
            UtilityKind::Water,
            Tariff {
                base_fee: 0.0,
                unit_rate: 21.5,
            },
        )
        .expect("valid tariff");
        assert_eq!(store.settings.water_unit_rate, 21.5);
        assert_eq!(store.settings.water_base_fee, 0.0);
        assert_eq!(
            store.settings.electric_base_fee,
            TariffSettings::default().electric_base_fee
        );
    }
}
