//! Reminder scheduling engine.
//!
//! The engine turns domain events into gateway calls. It keeps no state of
//! its own: each operation reads the current settings and the clock, then
//! cancels and/or schedules notifications.
//!
//! Per reminder kind the pending store behaves like a two-state automaton
//! (absent / scheduled):
//!
//! | Operation | Cancels | May schedule |
//! |-----------|---------|--------------|
//! | `on_timer_start` | both timer kinds | deadline, then duration |
//! | `on_timer_stop` | both timer kinds | no-tasks reminder |
//! | `on_project_added` | - | project id |
//! | `on_project(s)_deleted` | given project ids | - |
//! | `on_instant_trigger` | - | the given kind |
//!
//! Gateway failures (quiet hours, store errors) are logged and dropped: a
//! reminder that cannot be set never fails the action that triggered it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::content::ScheduledNotificationRequest;
use crate::error::ScheduleError;
use crate::events::{ProjectEvent, ReminderEvent, TimerSnapshot};
use crate::gateway::NotificationGateway;
use crate::policy::TimeSetter;
use crate::settings::{ReminderKey, ReminderSettings};

/// Project reminders are only set when the deadline is further away than
/// the lead time plus this margin.
pub const PROJECT_DEADLINE_MARGIN: Duration = Duration::from_secs(86_400);

/// Delay used by [`SchedulingEngine::on_instant_trigger`].
pub const DEFAULT_INSTANT_DELAY: Duration = Duration::from_secs(2);

/// `now + (border - passed)` when `passed < border`, otherwise `None`.
///
/// Reaching the border exactly counts as already passed.
pub fn calculate_future_date(
    now: DateTime<Utc>,
    passed: Duration,
    border: Option<Duration>,
) -> Option<DateTime<Utc>> {
    let limit = border?;
    if passed >= limit {
        return None;
    }
    offset(now, limit - passed)
}

fn offset(now: DateTime<Utc>, by: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(by)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
}

pub struct SchedulingEngine<G> {
    gateway: G,
    settings: Arc<dyn ReminderSettings>,
    project_anchor: Arc<dyn TimeSetter>,
    clock: Arc<dyn Clock>,
    instant_delay: Duration,
}

impl<G: NotificationGateway> SchedulingEngine<G> {
    pub fn new(
        gateway: G,
        settings: impl ReminderSettings + 'static,
        project_anchor: impl TimeSetter + 'static,
    ) -> Self {
        Self {
            gateway,
            settings: Arc::new(settings),
            project_anchor: Arc::new(project_anchor),
            clock: Arc::new(SystemClock),
            instant_delay: DEFAULT_INSTANT_DELAY,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_instant_delay(mut self, delay: Duration) -> Self {
        self.instant_delay = delay;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Replace any timer reminders with ones matching the new session.
    pub async fn on_timer_start(&self, timer: TimerSnapshot) {
        self.remove_timer_notifications().await;
        let now = self.clock.now();

        self.schedule_timer_threshold(
            ReminderKey::TimerPassedDeadline,
            now,
            timer.elapsed,
            timer.deadline,
        )
        .await;
        self.schedule_timer_threshold(
            ReminderKey::TimerPassedDuration,
            now,
            timer.elapsed,
            timer.target_duration,
        )
        .await;
    }

    /// Drop timer reminders and, if enabled, nudge the user to add a task.
    pub async fn on_timer_stop(&self) {
        self.remove_timer_notifications().await;

        let key = ReminderKey::NoTasksAddedSince;
        let Some(after) = self.settings.time(key) else {
            debug!(key = %key, "reminder disabled, not scheduling");
            return;
        };
        let Some(fire_date) = offset(self.clock.now(), after) else {
            warn!(key = %key, ?after, "reminder offset out of range");
            return;
        };

        self.submit(ScheduledNotificationRequest::for_key(
            key,
            fire_date,
            self.settings.as_ref(),
        ))
        .await;
    }

    async fn schedule_timer_threshold(
        &self,
        key: ReminderKey,
        now: DateTime<Utc>,
        elapsed: Duration,
        threshold: Option<Duration>,
    ) {
        if self.settings.time(key).is_none() {
            debug!(key = %key, "reminder disabled, not scheduling");
            return;
        }
        let Some(fire_date) = calculate_future_date(now, elapsed, threshold) else {
            debug!(key = %key, ?elapsed, ?threshold, "threshold absent or already passed");
            return;
        };

        self.submit(ScheduledNotificationRequest::for_key(
            key,
            fire_date,
            self.settings.as_ref(),
        ))
        .await;
    }

    async fn remove_timer_notifications(&self) {
        let ids: Vec<String> = ReminderKey::TIMER_KEYS
            .iter()
            .map(|key| key.as_str().to_string())
            .collect();
        self.gateway.remove_pending_notifications(&ids).await;
    }

    // ── Projects ─────────────────────────────────────────────────────

    /// Schedule the deadline reminder for a new project.
    ///
    /// The reminder fires `lead` before the deadline, pinned to the anchor
    /// time of day. Nothing is scheduled when the setting is off or the
    /// deadline is within `lead + 1 day`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::AnchorUnrepresentable`] if the anchor time
    /// does not exist on the target day. Gateway failures are not errors.
    pub async fn on_project_added(&self, project: &ProjectEvent) -> Result<(), ScheduleError> {
        let key = ReminderKey::ProjectDeadlineReached;
        let Some(lead) = self.settings.time(key) else {
            debug!(project_id = %project.id, "project reminder disabled, not scheduling");
            return Ok(());
        };
        let Some(guard) = lead.checked_add(PROJECT_DEADLINE_MARGIN) else {
            warn!(project_id = %project.id, ?lead, "project lead time out of range");
            return Ok(());
        };
        let Ok(lead) = TimeDelta::from_std(lead) else {
            warn!(project_id = %project.id, ?lead, "project lead time out of range");
            return Ok(());
        };

        let now = self.clock.now();
        let earliest_deadline = offset(now, guard);
        if !earliest_deadline.is_some_and(|earliest| project.deadline > earliest) {
            debug!(
                project_id = %project.id,
                deadline = %project.deadline,
                "deadline too close for a reminder"
            );
            return Ok(());
        }

        let Some(specific_day) = project.deadline.checked_sub_signed(lead) else {
            warn!(project_id = %project.id, ?lead, "project reminder day out of range");
            return Ok(());
        };
        let fire_date = self.project_anchor.set_time(specific_day)?;
        if fire_date <= now {
            debug!(project_id = %project.id, %fire_date, "anchored fire date is not in the future");
            return Ok(());
        }

        self.submit(ScheduledNotificationRequest::for_project(
            project.id.clone(),
            fire_date,
            self.settings.as_ref(),
        ))
        .await;
        Ok(())
    }

    pub async fn on_project_deleted(&self, id: &str) {
        self.gateway
            .remove_pending_notifications(&[id.to_string()])
            .await;
    }

    pub async fn on_projects_deleted(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        self.gateway.remove_pending_notifications(ids).await;
    }

    // ── Manual ───────────────────────────────────────────────────────

    /// Fire `key` shortly from now, ignoring whether it is enabled.
    pub async fn on_instant_trigger(&self, key: ReminderKey) {
        let Some(fire_date) = offset(self.clock.now(), self.instant_delay) else {
            warn!(key = %key, delay = ?self.instant_delay, "instant delay out of range");
            return;
        };
        self.submit(ScheduledNotificationRequest::for_key(
            key,
            fire_date,
            self.settings.as_ref(),
        ))
        .await;
    }

    /// Route a domain event to the matching operation.
    ///
    /// # Errors
    ///
    /// Only configuration-fatal errors from project scheduling.
    pub async fn dispatch(&self, event: ReminderEvent) -> Result<(), ScheduleError> {
        debug!(event = event.type_name(), "dispatching reminder event");
        match event {
            ReminderEvent::TimerStarted {
                elapsed_secs,
                deadline_secs,
                target_duration_secs,
            } => {
                self.on_timer_start(TimerSnapshot {
                    elapsed: Duration::from_secs(elapsed_secs),
                    deadline: deadline_secs.map(Duration::from_secs),
                    target_duration: target_duration_secs.map(Duration::from_secs),
                })
                .await
            }
            ReminderEvent::TimerStopped => self.on_timer_stop().await,
            ReminderEvent::ProjectAdded {
                id,
                title,
                deadline,
            } => {
                self.on_project_added(&ProjectEvent {
                    id,
                    title,
                    deadline,
                })
                .await?
            }
            ReminderEvent::ProjectDeleted { id } => self.on_project_deleted(&id).await,
            ReminderEvent::ProjectsDeleted { ids } => self.on_projects_deleted(&ids).await,
            ReminderEvent::InstantTrigger { key } => self.on_instant_trigger(key).await,
        }
        Ok(())
    }

    /// Hand a request to the gateway; failures are logged and discarded.
    async fn submit(&self, request: ScheduledNotificationRequest) {
        let id = request.id().to_string();
        let category = request.category_id().to_string();
        let fire_date = request.fire_date();

        if let Err(error) = self.gateway.set_notification(request).await {
            warn!(id = %id, category = %category, %fire_date, %error, "reminder dropped");
        }
    }
}
