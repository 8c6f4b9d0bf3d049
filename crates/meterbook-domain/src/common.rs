//! Identity helpers shared by entities kept in the meter store.

use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the meter store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Looks up an entity by identifier within a slice.
pub fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Maps a numeric id from older data files (millisecond timestamps) onto a UUID.
///
/// The mapping is deterministic, so a reading's `customerId` and the
/// customer's own id still match after conversion.
pub fn legacy_id(value: u64) -> Uuid {
    Uuid::from_u128(u128::from(value))
}

/// Parses a UUID or a numeric legacy id.
pub fn parse_id(text: &str) -> Result<Uuid, String> {
    if let Ok(id) = Uuid::parse_str(text) {
        return Ok(id);
    }
    text.trim()
        .parse::<u64>()
        .map(legacy_id)
        .map_err(|_| format!("`{}` is neither a UUID nor a numeric legacy id", text))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

/// serde `deserialize_with` for id fields.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(value) => Ok(legacy_id(value)),
        RawId::Text(text) => parse_id(&text).map_err(de::Error::custom),
    }
}

/// serde `deserialize_with` for maps keyed by id.
pub fn deserialize_id_map<'de, D, V>(deserializer: D) -> Result<BTreeMap<Uuid, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    BTreeMap::<String, V>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| {
            parse_id(&key)
                .map(|id| (id, value))
                .map_err(de::Error::custom)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_map_deterministically() {
        assert_eq!(parse_id("1718000000000"), Ok(legacy_id(1_718_000_000_000)));
        assert_eq!(
            parse_id("7c9e6679-7425-40de-944b-e07fc1f90ae7").unwrap().to_string(),
            "7c9e6679-7425-40de-944b-e07fc1f90ae7"
        );
        assert!(parse_id("abc").is_err());
    }
}
