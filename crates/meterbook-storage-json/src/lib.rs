//! meterbook-storage-json
//!
//! Single-file JSON persistence for the meter store, with rolling backups.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use meterbook_core::{
    storage::{StoreBackupInfo, StoreStorage},
    CoreError,
};
use meterbook_domain::MeterStore;
use tracing::{debug, warn};

const STORE_FILE: &str = "store.json";
const BACKUP_PREFIX: &str = "store";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Where the store file and its backups live.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
    pub backups_dir: PathBuf,
}

impl StoragePaths {
    /// `<root>/store.json` with backups in `<root>/backups`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let data_dir = root.into();
        let backups_dir = data_dir.join("backups");
        Self {
            data_dir,
            backups_dir,
        }
    }
}

/// Filesystem-backed JSON persistence for the store and its backups.
#[derive(Debug, Clone)]
pub struct JsonStoreStorage {
    store_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStoreStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_dir)?;
        fs::create_dir_all(&paths.backups_dir)?;
        Ok(Self {
            store_path: paths.data_dir.join(STORE_FILE),
            backups_dir: paths.backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        if !self.store_path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let mut stamp = Utc::now();
        let mut file_name = backup_file_name(stamp);
        // Saves within the same millisecond get the next free stamp.
        while self.backups_dir.join(&file_name).exists() {
            stamp += Duration::milliseconds(1);
            file_name = backup_file_name(stamp);
        }
        fs::copy(&self.store_path, self.backups_dir.join(&file_name))?;
        debug!(backup = %file_name, "previous store backed up");
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StoreStorage for JsonStoreStorage {
    fn save_store(&self, store: &MeterStore) -> Result<(), CoreError> {
        self.backup_existing_file()?;
        let tmp = tmp_path(&self.store_path);
        write_all(&tmp, &serialize_store(store)?)?;
        fs::rename(&tmp, &self.store_path)?;
        debug!(path = %self.store_path.display(), "store saved");
        Ok(())
    }

    fn load_store(&self) -> Result<MeterStore, CoreError> {
        load_store_from_path(&self.store_path)
    }

    fn store_exists(&self) -> bool {
        self.store_path.exists()
    }

    fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Newest first.
    fn list_backups(&self) -> Result<Vec<StoreBackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(created) = parse_backup_timestamp(file_name) else {
                continue;
            };
            entries.push((
                created,
                StoreBackupInfo {
                    id: file_name.to_string(),
                    created_at: created.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
                    path: path.clone(),
                },
            ));
        }
        entries.sort_by(|(a_time, a), (b_time, b)| (b_time, &b.id).cmp(&(a_time, &a.id)));
        Ok(entries.into_iter().map(|(_, info)| info).collect())
    }

    fn restore_backup(&self, backup: &StoreBackupInfo) -> Result<MeterStore, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let restored = load_store_from_path(&backup.path)?;
        self.save_store(&restored)?;
        Ok(restored)
    }
}

/// Loads a store from an arbitrary path, restoring date order in every partition.
pub fn load_store_from_path(path: &Path) -> Result<MeterStore, CoreError> {
    let data = fs::read_to_string(path)?;
    let mut store: MeterStore =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    for history in store.meter_data.values_mut() {
        history.normalize();
    }
    Ok(store)
}

fn backup_file_name(stamp: DateTime<Utc>) -> String {
    format!(
        "{}_{}.{}",
        BACKUP_PREFIX,
        stamp.format(BACKUP_TIMESTAMP_FORMAT),
        BACKUP_EXTENSION
    )
}

/// Accepts `store_YYYYMMDD_HHMMSS_mmm.json` and the older name without milliseconds.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_prefix('_')?
        .strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut parts = stem.split('_');
    let (date, time) = (parts.next()?, parts.next()?);
    let millis = parts.next().unwrap_or("000");
    if parts.next().is_some()
        || !is_digits(date, 8)
        || !is_digits(time, 6)
        || !is_digits(millis, 3)
    {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S").ok()?;
    let millis: i64 = millis.parse().ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc) + Duration::milliseconds(millis))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_store(store: &MeterStore) -> Result<String, CoreError> {
    serde_json::to_string_pretty(store).map_err(|err| CoreError::Serde(err.to_string()))
}
