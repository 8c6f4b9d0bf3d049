//! Meter readings and the per-customer history they are grouped into.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{deserialize_id, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
/// The two billable resources tracked for every customer.
pub enum UtilityKind {
    Water,
    Electric,
}

impl UtilityKind {
    pub const ALL: [UtilityKind; 2] = [UtilityKind::Water, UtilityKind::Electric];

    pub fn key(self) -> &'static str {
        match self {
            UtilityKind::Water => "water",
            UtilityKind::Electric => "electric",
        }
    }
}

impl fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UtilityKind::Water => "Water",
            UtilityKind::Electric => "Electric",
        };
        f.write_str(label)
    }
}

impl FromStr for UtilityKind {
    type Err = UnknownUtilityKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "water" | "w" => Ok(UtilityKind::Water),
            "electric" | "electricity" | "e" => Ok(UtilityKind::Electric),
            other => Err(UnknownUtilityKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when a utility kind label cannot be parsed.
pub struct UnknownUtilityKind(pub String);

impl fmt::Display for UnknownUtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown utility `{}` (use water or electric)", self.0)
    }
}

impl std::error::Error for UnknownUtilityKind {}

/// A single dated meter value. Readings are immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Uuid,
    #[serde(deserialize_with = "deserialize_id")]
    pub customer_id: Uuid,
    #[serde(rename = "type")]
    pub kind: UtilityKind,
    pub meter: f64,
    pub date: NaiveDate,
}

impl Reading {
    pub fn new(customer_id: Uuid, kind: UtilityKind, meter: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            kind,
            meter,
            date,
        }
    }
}

impl Identifiable for Reading {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Water and electric readings of one customer, each kept sorted by date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeterHistory {
    #[serde(default)]
    pub water: Vec<Reading>,
    #[serde(default)]
    pub electric: Vec<Reading>,
}

impl MeterHistory {
    pub fn readings(&self, kind: UtilityKind) -> &[Reading] {
        match kind {
            UtilityKind::Water => &self.water,
            UtilityKind::Electric => &self.electric,
        }
    }

    fn readings_mut(&mut self, kind: UtilityKind) -> &mut Vec<Reading> {
        match kind {
            UtilityKind::Water => &mut self.water,
            UtilityKind::Electric => &mut self.electric,
        }
    }

    /// Appends a reading to its partition and restores date order.
    ///
    /// The sort is stable, so readings sharing a date keep insertion order.
    pub fn insert(&mut self, reading: Reading) {
        let partition = self.readings_mut(reading.kind);
        partition.push(reading);
        partition.sort_by_key(|entry| entry.date);
    }

    pub fn remove(&mut self, kind: UtilityKind, id: Uuid) -> Option<Reading> {
        let partition = self.readings_mut(kind);
        let index = partition.iter().position(|reading| reading.id == id)?;
        Some(partition.remove(index))
    }

    pub fn latest(&self, kind: UtilityKind) -> Option<&Reading> {
        self.readings(kind).last()
    }

    pub fn clear(&mut self) {
        self.water.clear();
        self.electric.clear();
    }

    pub fn len(&self) -> usize {
        self.water.len() + self.electric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.water.is_empty() && self.electric.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        UtilityKind::ALL.iter().all(|kind| {
            self.readings(*kind)
                .windows(2)
                .all(|pair| pair[0].date <= pair[1].date)
        })
    }

    /// Re-sorts both partitions by date, e.g. after importing foreign data.
    pub fn normalize(&mut self) {
        self.water.sort_by_key(|reading| reading.date);
        self.electric.sort_by_key(|reading| reading.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn insert_keeps_partition_sorted_and_stable() {
        let customer = Uuid::new_v4();
        let mut history = MeterHistory::default();
        history.insert(Reading::new(customer, UtilityKind::Water, 150.0, date(2024, 2, 1)));
        history.insert(Reading::new(customer, UtilityKind::Water, 100.0, date(2024, 1, 1)));
        history.insert(Reading::new(customer, UtilityKind::Water, 160.0, date(2024, 2, 1)));
        history.insert(Reading::new(customer, UtilityKind::Electric, 10.0, date(2023, 12, 1)));

        let meters: Vec<f64> = history.water.iter().map(|r| r.meter).collect();
        assert_eq!(meters, vec![100.0, 150.0, 160.0]);
        assert_eq!(history.electric.len(), 1);
        assert!(history.is_sorted());
    }

    #[test]
    fn remove_only_touches_requested_partition() {
        let customer = Uuid::new_v4();
        let mut history = MeterHistory::default();
        let reading = Reading::new(customer, UtilityKind::Water, 1.0, date(2024, 1, 1));
        let id = reading.id;
        history.insert(reading);

        assert!(history.remove(UtilityKind::Electric, id).is_none());
        assert_eq!(history.remove(UtilityKind::Water, id).map(|r| r.id), Some(id));
        assert!(history.is_empty());
    }

    #[test]
    fn utility_kind_parses_loose_labels() {
        assert_eq!("Water".parse::<UtilityKind>(), Ok(UtilityKind::Water));
        assert_eq!(" electricity ".parse::<UtilityKind>(), Ok(UtilityKind::Electric));
        assert!("gas".parse::<UtilityKind>().is_err());
    }

    #[test]
    fn reading_serializes_kind_as_type() {
        let reading = Reading::new(Uuid::new_v4(), UtilityKind::Electric, 4.5, date(2024, 3, 9));
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["type"], "electric");
        assert_eq!(json["date"], "2024-03-09");
        assert!(json.get("customerId").is_some());
    }
}
