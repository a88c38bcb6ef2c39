//! Notification content and request mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::{ReminderKey, ReminderSettings};

/// Display content handed to the notification store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContent {
    pub title: String,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_name: Option<String>,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category_id: category_id.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    pub fn with_badge(mut self, badge: u32) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_sound(mut self, sound_name: impl Into<String>) -> Self {
        self.sound_name = Some(sound_name.into());
        self
    }
}

/// Read title and body for `key`; the category is always the key's raw value.
pub fn map_content(key: ReminderKey, settings: &dyn ReminderSettings) -> NotificationContent {
    NotificationContent::new(settings.title(key), key.as_str()).with_body(settings.body(key))
}

/// A one-shot notification to be committed to the store.
///
/// Immutable once built. Rescheduling is cancel-by-id followed by a new add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotificationRequest {
    id: String,
    fire_date: DateTime<Utc>,
    content: NotificationContent,
}

impl ScheduledNotificationRequest {
    pub fn new(id: impl Into<String>, fire_date: DateTime<Utc>, content: NotificationContent) -> Self {
        Self {
            id: id.into(),
            fire_date,
            content,
        }
    }

    /// Request whose id is the key's raw value.
    pub fn for_key(
        key: ReminderKey,
        fire_date: DateTime<Utc>,
        settings: &dyn ReminderSettings,
    ) -> Self {
        Self::new(key.as_str(), fire_date, map_content(key, settings))
    }

    /// Project deadline request: cancellable per project, grouped under
    /// the `projectDeadlineReached` category.
    pub fn for_project(
        project_id: impl Into<String>,
        fire_date: DateTime<Utc>,
        settings: &dyn ReminderSettings,
    ) -> Self {
        Self::new(
            project_id,
            fire_date,
            map_content(ReminderKey::ProjectDeadlineReached, settings),
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category_id(&self) -> &str {
        &self.content.category_id
    }

    pub fn title(&self) -> &str {
        &self.content.title
    }

    pub fn body(&self) -> Option<&str> {
        self.content.body.as_deref()
    }

    pub fn fire_date(&self) -> DateTime<Utc> {
        self.fire_date
    }

    pub fn content(&self) -> &NotificationContent {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ConfiguredSettings, ReminderSetting};
    use chrono::TimeZone;

    fn settings() -> ConfiguredSettings {
        ConfiguredSettings::new([
            (
                ReminderKey::NoTasksAddedSince,
                ReminderSetting {
                    enabled_duration: None,
                    title: "Still there?".to_string(),
                    body: Some("Add a task to keep tracking".to_string()),
                },
            ),
            (
                ReminderKey::ProjectDeadlineReached,
                ReminderSetting {
                    enabled_duration: None,
                    title: "Deadline ahead".to_string(),
                    body: None,
                },
            ),
        ])
    }

    #[test]
    fn test_map_content_reads_settings() {
        let content = map_content(ReminderKey::NoTasksAddedSince, &settings());
        assert_eq!(content.title, "Still there?");
        assert_eq!(content.category_id, "noTasksHasBeenAddedSince");
        assert_eq!(content.body.as_deref(), Some("Add a task to keep tracking"));
        assert_eq!(content.subtitle, None);
    }

    #[test]
    fn test_key_request_uses_raw_value_as_id() {
        let fire_date = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let request =
            ScheduledNotificationRequest::for_key(ReminderKey::NoTasksAddedSince, fire_date, &settings());
        assert_eq!(request.id(), "noTasksHasBeenAddedSince");
        assert_eq!(request.category_id(), "noTasksHasBeenAddedSince");
        assert_eq!(request.fire_date(), fire_date);
    }

    #[test]
    fn test_project_request_keeps_project_id_and_shared_category() {
        let fire_date = Utc.with_ymd_and_hms(2024, 2, 1, 10, 30, 0).unwrap();
        let request = ScheduledNotificationRequest::for_project("p1", fire_date, &settings());
        assert_eq!(request.id(), "p1");
        assert_eq!(request.category_id(), "projectDeadlineReached");
        assert_eq!(request.title(), "Deadline ahead");
        assert_eq!(request.body(), None);
    }

    #[test]
    fn test_optional_fields_are_omitted_from_json() {
        let content = NotificationContent::new("Hi", "cat").with_badge(3).with_sound("chime");
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["categoryId"], "cat");
        assert_eq!(json["badge"], 3);
        assert_eq!(json["soundName"], "chime");
        assert!(json.get("body").is_none());
        assert!(json.get("subtitle").is_none());
    }
}
