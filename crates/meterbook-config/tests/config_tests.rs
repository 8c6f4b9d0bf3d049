use meterbook_config::{Config, ConfigError, ConfigManager, Theme};
use tempfile::tempdir;

#[test]
fn default_config_has_usable_values() {
    let cfg = Config::default();

    assert!(!cfg.currency_symbol.is_empty());
    assert!(cfg.sync_url.is_none());
    assert!(cfg.backup_retention > 0);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.currency_symbol = "R$".to_string();
    cfg.theme = Theme::Plain;
    cfg.set_sync_url("https://sync.example.com/exec").unwrap();

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn failed_update_leaves_file_untouched() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let result = manager.update(|cfg| cfg.set_sync_url("not a url"));

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
    assert!(!manager.config_path().exists());
}

#[test]
fn data_root_defaults_under_base_dir() {
    let dir = tempdir().expect("tempdir");
    let cfg = Config::default();
    assert_eq!(cfg.resolve_data_root(dir.path()), dir.path().join("data"));
}

#[test]
fn files_with_retired_keys_still_load() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::create_dir_all(manager.config_path().parent().unwrap()).unwrap();
    std::fs::write(
        manager.config_path(),
        r#"{"locale": "th-TH", "currency_symbol": "฿"}"#,
    )
    .unwrap();

    let cfg = manager.load().expect("load");
    assert_eq!(cfg.currency_symbol, "฿");
    assert_eq!(cfg.backup_retention, Config::default().backup_retention);
}
