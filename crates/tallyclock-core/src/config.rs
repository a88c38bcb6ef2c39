//! TOML-based application configuration.
//!
//! Stores reminder preferences including:
//! - Timezone used for quiet hours and the project anchor
//! - Quiet (forbidden) hours
//! - Time of day at which project deadline reminders fire
//! - Per-reminder delay, title and body
//!
//! Configuration is stored at `~/.config/tallyclock/config.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarResolver;
use crate::error::ConfigError;
use crate::policy::{DateAnchor, QuietHoursPolicy};
use crate::settings::{ConfiguredSettings, ReminderKey, ReminderSetting};

/// Resolve the data directory, honouring `TALLYCLOCK_ENV=dev`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TALLYCLOCK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tallyclock-dev")
    } else {
        base_dir.join("tallyclock")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Quiet hours configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuietHoursConfig {
    #[serde(default = "default_forbidden_hours")]
    pub forbidden_hours: Vec<u32>,
}

/// Time of day for project deadline reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    #[serde(default = "default_anchor_hour")]
    pub hour: u32,
    #[serde(default = "default_anchor_minute")]
    pub minute: u32,
}

/// One reminder kind. `after_secs` unset means the reminder is off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default)]
    pub after_secs: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl ReminderConfig {
    fn off(key: ReminderKey) -> Self {
        Self {
            after_secs: None,
            title: key.default_title().to_string(),
            body: None,
        }
    }

    fn to_setting(&self, key: ReminderKey) -> ReminderSetting {
        let title = if self.title.is_empty() {
            key.default_title().to_string()
        } else {
            self.title.clone()
        };
        ReminderSetting {
            enabled_duration: self.after_secs.map(Duration::from_secs),
            title,
            body: self.body.clone(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tallyclock/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone name. Unset means UTC.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_instant_delay_secs")]
    pub instant_delay_secs: u64,
    #[serde(default)]
    pub quiet_hours: QuietHoursConfig,
    #[serde(default)]
    pub project_anchor: AnchorConfig,
    /// Keyed by reminder raw value, e.g. `timerPassedItsDeadline`.
    #[serde(default = "default_reminders")]
    pub reminders: BTreeMap<String, ReminderConfig>,
}

/// Optional fields holding numbers; every other optional holds text.
const NUMERIC_OPTIONAL_FIELDS: &[&str] = &["after_secs"];

// Default functions
fn default_forbidden_hours() -> Vec<u32> {
    vec![22, 23, 0, 1, 2, 3, 4, 5]
}
fn default_anchor_hour() -> u32 {
    10
}
fn default_anchor_minute() -> u32 {
    30
}
fn default_instant_delay_secs() -> u64 {
    2
}
fn default_reminders() -> BTreeMap<String, ReminderConfig> {
    ReminderKey::ALL
        .into_iter()
        .map(|key| (key.as_str().to_string(), ReminderConfig::off(key)))
        .collect()
}

impl Default for QuietHoursConfig {
    fn default() -> Self {
        Self {
            forbidden_hours: default_forbidden_hours(),
        }
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            hour: default_anchor_hour(),
            minute: default_anchor_minute(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: None,
            instant_delay_secs: default_instant_delay_secs(),
            quiet_hours: QuietHoursConfig::default(),
            project_anchor: AnchorConfig::default(),
            reminders: default_reminders(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn parse_leaf(
        key: &str,
        field: &str,
        existing: &serde_json::Value,
        value: &str,
    ) -> Result<serde_json::Value, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let number = || {
            value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))
        };

        if value == "null" {
            return Ok(serde_json::Value::Null);
        }

        match existing {
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|e| invalid(e.to_string())),
            serde_json::Value::Number(_) => number(),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))
            }
            // An unset optional carries no type; take it from the field name.
            serde_json::Value::Null if NUMERIC_OPTIONAL_FIELDS.contains(&field) => number(),
            serde_json::Value::Null | serde_json::Value::String(_) => {
                Ok(serde_json::Value::String(value.into()))
            }
        }
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;
                let new_value = Self::parse_leaf(key, part, existing, value)?;
                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing and returning the default if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Persist to the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. `null` clears an optional.
    ///
    /// Only the in-memory value changes; call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result no longer forms a valid configuration.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check every section by building the runtime objects from it.
    ///
    /// # Errors
    ///
    /// Returns the first invalid section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quiet_hours_policy()?;
        self.project_anchor()?;
        self.settings()?;
        Ok(())
    }

    /// Calendar resolver for the configured timezone (UTC when unset).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimezone`] for names outside the tz database.
    pub fn calendar(&self) -> Result<CalendarResolver, ConfigError> {
        match self.timezone.as_deref() {
            Some(name) => CalendarResolver::named(name),
            None => Ok(CalendarResolver::utc()),
        }
    }

    pub fn quiet_hours_policy(&self) -> Result<QuietHoursPolicy, ConfigError> {
        QuietHoursPolicy::new(
            self.quiet_hours.forbidden_hours.iter().copied(),
            self.calendar()?,
        )
    }

    pub fn project_anchor(&self) -> Result<DateAnchor, ConfigError> {
        DateAnchor::new(
            self.calendar()?,
            self.project_anchor.hour,
            self.project_anchor.minute,
        )
    }

    /// Reminder settings table. Kinds missing from the file are off.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown reminder key.
    pub fn settings(&self) -> Result<ConfiguredSettings, ConfigError> {
        let mut entries = Vec::with_capacity(self.reminders.len());
        for (raw, reminder) in &self.reminders {
            let key: ReminderKey = raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: format!("reminders.{raw}"),
                message,
            })?;
            entries.push((key, reminder.to_setting(key)));
        }
        Ok(ConfiguredSettings::new(entries))
    }

    pub fn instant_delay(&self) -> Duration {
        Duration::from_secs(self.instant_delay_secs)
    }
}
