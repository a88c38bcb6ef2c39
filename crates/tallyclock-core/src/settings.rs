//! Reminder kinds and the per-kind user settings contract.
//!
//! Settings are owned by the application's preference storage. The engine
//! only reads them, once per scheduling decision, so a change made by the
//! user takes effect on the next domain event.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// The four reminder kinds managed by the engine.
///
/// The raw value doubles as the notification id and as the category id.
/// Project reminders are the exception: their id is the project's own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReminderKey {
    #[serde(rename = "timerPassedItsDeadline")]
    TimerPassedDeadline,
    #[serde(rename = "timerPassedTheDuration")]
    TimerPassedDuration,
    #[serde(rename = "noTasksHasBeenAddedSince")]
    NoTasksAddedSince,
    #[serde(rename = "projectDeadlineReached")]
    ProjectDeadlineReached,
}

impl ReminderKey {
    pub const ALL: [ReminderKey; 4] = [
        ReminderKey::TimerPassedDeadline,
        ReminderKey::TimerPassedDuration,
        ReminderKey::NoTasksAddedSince,
        ReminderKey::ProjectDeadlineReached,
    ];

    /// Ids cancelled together whenever a timer starts or stops.
    pub const TIMER_KEYS: [ReminderKey; 2] = [
        ReminderKey::TimerPassedDeadline,
        ReminderKey::TimerPassedDuration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderKey::TimerPassedDeadline => "timerPassedItsDeadline",
            ReminderKey::TimerPassedDuration => "timerPassedTheDuration",
            ReminderKey::NoTasksAddedSince => "noTasksHasBeenAddedSince",
            ReminderKey::ProjectDeadlineReached => "projectDeadlineReached",
        }
    }

    /// Title used when nothing has been configured for this kind.
    pub fn default_title(self) -> &'static str {
        match self {
            ReminderKey::TimerPassedDeadline => "Timer passed its deadline",
            ReminderKey::TimerPassedDuration => "Timer passed its planned duration",
            ReminderKey::NoTasksAddedSince => "No tasks added in a while",
            ReminderKey::ProjectDeadlineReached => "Project deadline is approaching",
        }
    }
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReminderKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown reminder key: {s}"))
    }
}

/// Read-only view of the user's reminder preferences.
///
/// `time` returning `None` means the reminder is switched off.
pub trait ReminderSettings: Send + Sync {
    fn time(&self, key: ReminderKey) -> Option<Duration>;
    fn title(&self, key: ReminderKey) -> String;
    fn body(&self, key: ReminderKey) -> Option<String>;
}

impl<S: ReminderSettings + ?Sized> ReminderSettings for Arc<S> {
    fn time(&self, key: ReminderKey) -> Option<Duration> {
        (**self).time(key)
    }

    fn title(&self, key: ReminderKey) -> String {
        (**self).title(key)
    }

    fn body(&self, key: ReminderKey) -> Option<String> {
        (**self).body(key)
    }
}

/// Configuration of a single reminder kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSetting {
    pub enabled_duration: Option<Duration>,
    pub title: String,
    pub body: Option<String>,
}

impl ReminderSetting {
    /// A switched-off setting carrying the kind's default title.
    pub fn disabled(key: ReminderKey) -> Self {
        Self {
            enabled_duration: None,
            title: key.default_title().to_string(),
            body: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled_duration.is_some()
    }
}

/// Shared, externally mutable settings table.
///
/// Clones share the same table: the preference layer keeps one handle and
/// calls [`ConfiguredSettings::update`], the engine reads through another.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredSettings {
    inner: Arc<RwLock<HashMap<ReminderKey, ReminderSetting>>>,
}

impl ConfiguredSettings {
    pub fn new(settings: impl IntoIterator<Item = (ReminderKey, ReminderSetting)>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings.into_iter().collect())),
        }
    }

    /// Replace the setting for `key`.
    pub fn update(&self, key: ReminderKey, setting: ReminderSetting) {
        self.inner.write().insert(key, setting);
    }

    /// Change only the enabled duration for `key`, keeping its texts.
    pub fn set_time(&self, key: ReminderKey, time: Option<Duration>) {
        self.inner
            .write()
            .entry(key)
            .or_insert_with(|| ReminderSetting::disabled(key))
            .enabled_duration = time;
    }

    pub fn get(&self, key: ReminderKey) -> ReminderSetting {
        self.inner
            .read()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ReminderSetting::disabled(key))
    }
}

impl ReminderSettings for ConfiguredSettings {
    fn time(&self, key: ReminderKey) -> Option<Duration> {
        self.inner.read().get(&key).and_then(|s| s.enabled_duration)
    }

    fn title(&self, key: ReminderKey) -> String {
        self.inner
            .read()
            .get(&key)
            .map(|s| s.title.clone())
            .unwrap_or_else(|| key.default_title().to_string())
    }

    fn body(&self, key: ReminderKey) -> Option<String> {
        self.inner.read().get(&key).and_then(|s| s.body.clone())
    }
}
