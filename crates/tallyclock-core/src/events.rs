//! Domain events that schedule or cancel reminders.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::ReminderKey;

/// Timer progress passed along with a start event. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerSnapshot {
    pub elapsed: Duration,
    /// Time budget after which "passed its deadline" fires.
    pub deadline: Option<Duration>,
    /// Planned duration after which "passed the duration" fires.
    pub target_duration: Option<Duration>,
}

impl TimerSnapshot {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_target_duration(mut self, target: Duration) -> Self {
        self.target_duration = Some(target);
        self
    }
}

/// A project that was just created. The id is caller-assigned and stable;
/// it becomes the notification id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEvent {
    pub id: String,
    pub title: String,
    pub deadline: DateTime<Utc>,
}

/// Domain events that affect reminders.
///
/// Serialized with a `type` tag so a dispatcher can feed JSON straight in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReminderEvent {
    TimerStarted {
        elapsed_secs: u64,
        #[serde(default)]
        deadline_secs: Option<u64>,
        #[serde(default)]
        target_duration_secs: Option<u64>,
    },
    TimerStopped,
    ProjectAdded {
        id: String,
        title: String,
        deadline: DateTime<Utc>,
    },
    ProjectDeleted {
        id: String,
    },
    ProjectsDeleted {
        ids: Vec<String>,
    },
    /// Fire a reminder shortly, regardless of settings (testing/demo).
    InstantTrigger {
        key: ReminderKey,
    },
}

impl ReminderEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            ReminderEvent::TimerStarted { .. } => "TimerStarted",
            ReminderEvent::TimerStopped => "TimerStopped",
            ReminderEvent::ProjectAdded { .. } => "ProjectAdded",
            ReminderEvent::ProjectDeleted { .. } => "ProjectDeleted",
            ReminderEvent::ProjectsDeleted { .. } => "ProjectsDeleted",
            ReminderEvent::InstantTrigger { .. } => "InstantTrigger",
        }
    }
}
