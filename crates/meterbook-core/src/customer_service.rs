//! Business logic helpers for validated customer mutations.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use meterbook_domain::{Customer, MeterStore};

use crate::CoreError;

/// Field values accepted when creating or editing a customer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
}

impl CustomerDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Provides validated mutations for [`Customer`] entities.
pub struct CustomerService;

impl CustomerService {
    /// Adds a customer and prepares an empty meter history for it.
    pub fn add(
        store: &mut MeterStore,
        draft: CustomerDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        let name = Self::validate_name(&draft.name)?;
        let customer = Customer {
            id: Uuid::new_v4(),
            name,
            address: normalize(draft.address),
            phone: normalize(draft.phone),
            note: normalize(draft.note),
            created_at,
        };
        let id = customer.id;
        store.customers.push(customer);
        store.history_entry(id);
        store.touch();
        info!(customer = %id, "customer added");
        Ok(id)
    }

    /// Replaces the editable fields; the id and creation time are kept.
    pub fn edit(store: &mut MeterStore, id: Uuid, draft: CustomerDraft) -> Result<(), CoreError> {
        let name = Self::validate_name(&draft.name)?;
        let customer = store
            .customer_mut(id)
            .ok_or(CoreError::CustomerNotFound(id))?;
        customer.name = name;
        customer.address = normalize(draft.address);
        customer.phone = normalize(draft.phone);
        customer.note = normalize(draft.note);
        store.touch();
        Ok(())
    }

    /// Removes a customer together with all of its readings.
    pub fn remove(store: &mut MeterStore, id: Uuid) -> Result<Customer, CoreError> {
        let index = store
            .customers
            .iter()
            .position(|customer| customer.id == id)
            .ok_or(CoreError::CustomerNotFound(id))?;
        let removed = store.customers.remove(index);
        let readings = store
            .meter_data
            .remove(&id)
            .map(|history| history.len())
            .unwrap_or(0);
        store.touch();
        info!(customer = %id, readings, "customer removed");
        Ok(removed)
    }

    /// Returns the customers in store order.
    pub fn list(store: &MeterStore) -> Vec<&Customer> {
        store.customers.iter().collect()
    }

    /// Resolves a user-supplied reference: a 1-based list position, a full
    /// id, an id prefix, or a case-insensitive exact name.
    pub fn find<'a>(store: &'a MeterStore, reference: &str) -> Result<&'a Customer, CoreError> {
        let needle = reference.trim();
        if let Ok(position) = needle.parse::<usize>() {
            if let Some(customer) = position
                .checked_sub(1)
                .and_then(|index| store.customers.get(index))
            {
                return Ok(customer);
            }
        }
        if let Ok(id) = Uuid::parse_str(needle) {
            return store.customer(id).ok_or(CoreError::CustomerNotFound(id));
        }
        let lowered = needle.to_ascii_lowercase();
        let by_prefix: Vec<&Customer> = store
            .customers
            .iter()
            .filter(|customer| {
                lowered.len() >= 4 && customer.id.simple().to_string().starts_with(&lowered)
            })
            .collect();
        if by_prefix.len() == 1 {
            return Ok(by_prefix[0]);
        }
        let by_name: Vec<&Customer> = store
            .customers
            .iter()
            .filter(|customer| customer.name.trim().eq_ignore_ascii_case(needle))
            .collect();
        match by_name.as_slice() {
            [customer] => Ok(*customer),
            [] => Err(CoreError::Validation(format!(
                "no customer matches `{}`",
                needle
            ))),
            _ => Err(CoreError::Validation(format!(
                "`{}` matches several customers; use the list number instead",
                needle
            ))),
        }
    }

    fn validate_name(candidate: &str) -> Result<String, CoreError> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(CoreError::Validation("customer name is required".into()))
        } else {
            Ok(trimmed.to_string())
        }
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use meterbook_domain::{Reading, UtilityKind};

    use super::*;

    #[test]
    fn add_rejects_blank_names() {
        let mut store = MeterStore::new();
        let err = CustomerService::add(&mut store, CustomerDraft::named("   "), Utc::now())
            .expect_err("blank name must fail");
        assert!(
            matches!(err, CoreError::Validation(ref message) if message.contains("required")),
            "unexpected error: {err:?}"
        );
        assert!(store.customers.is_empty());
    }

    #[test]
    fn add_trims_fields_and_creates_history() {
        let mut store = MeterStore::new();
        let draft = CustomerDraft {
            name: "  Niran ".into(),
            address: Some(" 99 Soi 5 ".into()),
            phone: Some("   ".into()),
            note: None,
        };
        let id = CustomerService::add(&mut store, draft, Utc::now()).expect("add succeeds");

        let stored = store.customer(id).expect("customer exists");
        assert_eq!(stored.name, "Niran");
        assert_eq!(stored.address.as_deref(), Some("99 Soi 5"));
        assert!(stored.phone.is_none());
        assert!(store.history(id).is_some());
    }

    #[test]
    fn edit_keeps_identity_and_creation_time() {
        let mut store = MeterStore::new();
        let id = CustomerService::add(&mut store, CustomerDraft::named("Before"), Utc::now())
            .unwrap();
        let created = store.customer(id).unwrap().created_at;

        let mut changes = CustomerDraft::named("After");
        changes.note = Some("meter behind gate".into());
        CustomerService::edit(&mut store, id, changes).expect("edit succeeds");

        let stored = store.customer(id).unwrap();
        assert_eq!(stored.name, "After");
        assert_eq!(stored.created_at, created);
        assert_eq!(stored.note.as_deref(), Some("meter behind gate"));
    }

    #[test]
    fn remove_cascades_to_readings() {
        let mut store = MeterStore::new();
        let id = CustomerService::add(&mut store, CustomerDraft::named("Gone"), Utc::now())
            .unwrap();
        store.history_entry(id).insert(Reading::new(
            id,
            UtilityKind::Electric,
            42.0,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        ));

        CustomerService::remove(&mut store, id).expect("remove succeeds");

        assert!(store.customer(id).is_none());
        assert!(store.history(id).is_none());
        assert!(matches!(
            CustomerService::remove(&mut store, id),
            Err(CoreError::CustomerNotFound(_))
        ));
    }

    #[test]
    fn find_accepts_position_name_and_id() {
        let mut store = MeterStore::new();
        let first = CustomerService::add(&mut store, CustomerDraft::named("Ploy"), Utc::now())
            .unwrap();
        let second = CustomerService::add(&mut store, CustomerDraft::named("Kiet"), Utc::now())
            .unwrap();

        assert_eq!(CustomerService::find(&store, "1").unwrap().id, first);
        assert_eq!(CustomerService::find(&store, "kiet").unwrap().id, second);
        assert_eq!(
            CustomerService::find(&store, &second.to_string()).unwrap().id,
            second
        );
        let prefix: String = first.simple().to_string().chars().take(8).collect();
        assert_eq!(CustomerService::find(&store, &prefix).unwrap().id, first);
        assert!(CustomerService::find(&store, "nobody").is_err());
    }
}
