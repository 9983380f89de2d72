use crate::core::calculator::duration::OVERTIME_THRESHOLD_HOURS;
use crate::core::dashboard::DashboardSettings;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use crate::utils::time::{CivilClock, parse_offset};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys every configuration file should carry.
pub const KNOWN_KEYS: [&str; 7] = [
    "database",
    "photo_dir",
    "photo_base_url",
    "utc_offset",
    "overtime_threshold_hours",
    "trend_window_days",
    "top_helper_companies",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,
    /// Public prefix of stored photos; empty means `file://` URLs.
    #[serde(default)]
    pub photo_base_url: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_overtime")]
    pub overtime_threshold_hours: f64,
    #[serde(default = "default_trend_window")]
    pub trend_window_days: i64,
    #[serde(default = "default_top_helpers")]
    pub top_helper_companies: usize,
}

fn default_photo_dir() -> String {
    Config::config_dir().join("photos").to_string_lossy().to_string()
}
fn default_utc_offset() -> String {
    "+04:00".to_string()
}
fn default_overtime() -> f64 {
    OVERTIME_THRESHOLD_HOURS
}
fn default_trend_window() -> i64 {
    30
}
fn default_top_helpers() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            photo_dir: default_photo_dir(),
            photo_base_url: String::new(),
            utc_offset: default_utc_offset(),
            overtime_threshold_hours: default_overtime(),
            trend_window_days: default_trend_window(),
            top_helper_companies: default_top_helpers(),
        }
    }
}

impl Config {
    /// `~/.drivershift`, or `./.drivershift` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".drivershift")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("drivershift.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("drivershift.sqlite")
    }

    /// Load the configuration file, or defaults when there is none yet.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.photo_dir = expand_tilde(&cfg.photo_dir).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(path).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Keys of `KNOWN_KEYS` absent from the YAML text.
    pub fn missing_keys(yaml: &str) -> AppResult<Vec<&'static str>> {
        let value: Value =
            serde_yaml::from_str(yaml).map_err(|e| AppError::Config(e.to_string()))?;
        let map = value
            .as_mapping()
            .ok_or_else(|| AppError::Config("configuration is not a YAML mapping".into()))?;

        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(Value::String((*k).to_string())))
            .collect())
    }

    pub fn offset(&self) -> AppResult<FixedOffset> {
        parse_offset(&self.utc_offset).ok_or_else(|| {
            AppError::Config(format!(
                "utc_offset '{}' must look like +04:00",
                self.utc_offset
            ))
        })
    }

    pub fn clock(&self) -> AppResult<CivilClock> {
        Ok(CivilClock::new(self.offset()?))
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            overtime_threshold: self.overtime_threshold_hours,
            trend_window_days: self.trend_window_days,
            top_helper_companies: self.top_helper_companies,
        }
    }

    /// Create the config directory, write the configuration file (unless
    /// `is_test`) and return the configuration that was set up.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let mut cfg = Self::default();
        if let Some(name) = custom_db {
            let p = expand_tilde(name);
            let p = if p.is_absolute() { p } else { dir.join(p) };
            cfg.database = p.to_string_lossy().to_string();
        }

        if !is_test {
            let path = Self::config_file();
            cfg.save_to(&path)?;
        }

        Ok(cfg)
    }
}
