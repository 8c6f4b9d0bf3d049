use serde::{de::Deserializer, Deserialize, Serialize};
use std::{fmt, path::PathBuf};

use crate::ConfigError;

/// User-configurable CLI preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Period key the shell starts with, e.g. `current_month`.
    #[serde(default = "Config::default_period_value")]
    pub default_period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_url: Option<String>,
    /// Pull from `sync_url` once when the shell starts.
    #[serde(default)]
    pub auto_pull: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the store file. Defaults to `<base>/data`.
    pub data_root: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            theme: Theme::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            default_period: Self::default_period_value(),
            sync_url: None,
            auto_pull: false,
            data_root: None,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_period_value() -> String {
        "current_month".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_data_root(&self, base: &std::path::Path) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    /// Sets the sync endpoint. Only `http://` and `https://` URLs are accepted.
    pub fn set_sync_url(&mut self, url: &str) -> Result<(), ConfigError> {
        let trimmed = url.trim();
        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => {
                self.sync_url = Some(trimmed.to_string());
                Ok(())
            }
            _ => Err(ConfigError::Invalid(format!(
                "sync url must be an http(s) address, got `{}`",
                trimmed
            ))),
        }
    }

    pub fn clear_sync_url(&mut self) {
        self.sync_url = None;
        self.auto_pull = false;
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Plain,
    #[default]
    Iconic,
}

impl Theme {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Theme::Plain,
            _ => Theme::Iconic,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Plain => "plain",
            Theme::Iconic => "iconic",
        })
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|v| Theme::parse(&v)).unwrap_or_default())
    }
}
