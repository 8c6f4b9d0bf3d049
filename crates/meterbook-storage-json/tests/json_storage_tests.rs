use std::fs;

use chrono::NaiveDate;
use meterbook_core::storage::StoreStorage;
use meterbook_domain::{Customer, MeterStore, Reading, UtilityKind};
use meterbook_storage_json::{JsonStoreStorage, StoragePaths};
use tempfile::tempdir;

fn sample_store() -> MeterStore {
    let mut store = MeterStore::new();
    let customer = Customer::new("Stored").with_address("12 Canal Rd");
    let id = customer.id;
    store.customers.push(customer);
    store.history_entry(id).insert(Reading::new(
        id,
        UtilityKind::Water,
        42.5,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    ));
    store
}

#[test]
fn missing_store_loads_as_empty() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStoreStorage::new(StoragePaths::under(dir.path())).expect("storage");

    assert!(!storage.store_exists());
    let store = storage.load_or_default().expect("load");
    assert!(store.customers.is_empty());
    assert_eq!(store.settings, MeterStore::default().settings);
}

#[test]
fn json_storage_can_save_and_load_store() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStoreStorage::new(StoragePaths::under(dir.path())).expect("storage");
    let store = sample_store();

    storage.save_store(&store).expect("save");
    let loaded = storage.load_store().expect("load");

    assert_eq!(loaded, store);
    assert_eq!(storage.store_path(), dir.path().join("store.json"));
    let raw = fs::read_to_string(storage.store_path()).unwrap();
    assert!(raw.contains("\"meterData\""));
    assert!(raw.contains("\"type\": \"water\""));
}

#[test]
fn second_save_backs_up_previous_file() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStoreStorage::new(StoragePaths::under(dir.path())).expect("storage");

    storage.save_store(&MeterStore::new()).expect("first save");
    assert!(storage.list_backups().unwrap().is_empty());

    storage.save_store(&sample_store()).expect("second save");
    let backups = storage.list_backups().expect("list");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].id.starts_with("store_"));

    let restored = storage.restore_backup(&backups[0]).expect("restore");
    assert!(restored.customers.is_empty());
    assert!(storage.load_store().unwrap().customers.is_empty());
}

#[test]
fn backups_are_pruned_to_retention() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let storage = JsonStoreStorage::with_retention(paths.clone(), 2).expect("storage");
    storage.save_store(&MeterStore::new()).expect("seed");
    for stamp in ["20200101_000000", "20200102_000000", "20200103_000000"] {
        fs::write(paths.backups_dir.join(format!("store_{stamp}.json")), "{}").unwrap();
    }

    storage.save_store(&sample_store()).expect("save");

    let ids: Vec<String> = storage
        .list_backups()
        .unwrap()
        .into_iter()
        .map(|info| info.id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&"store_20200101_000000.json".to_string()));
    assert!(!ids.contains(&"store_20200102_000000.json".to_string()));
}

#[test]
fn unsorted_file_is_normalized_on_load() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStoreStorage::new(StoragePaths::under(dir.path())).expect("storage");
    let mut store = sample_store();
    let id = store.customers[0].id;
    store.history_entry(id).water.push(Reading::new(
        id,
        UtilityKind::Water,
        10.0,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ));
    storage.save_store(&store).expect("save");

    let loaded = storage.load_store().expect("load");
    assert!(loaded.history(id).unwrap().is_sorted());
    assert_eq!(loaded.readings(id, UtilityKind::Water)[0].meter, 10.0);
}

#[test]
fn rapid_saves_keep_every_backup() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStoreStorage::with_retention(StoragePaths::under(dir.path()), 10)
        .expect("storage");

    storage.save_store(&MeterStore::new()).expect("seed");
    for _ in 0..4 {
        storage.save_store(&sample_store()).expect("save");
    }

    let backups = storage.list_backups().expect("list");
    assert_eq!(backups.len(), 4);
    let mut ids: Vec<_> = backups.iter().map(|info| info.id.clone()).collect();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}
