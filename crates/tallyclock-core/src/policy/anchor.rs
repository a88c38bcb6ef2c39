//! Anchor a date to a fixed daily time of day.
//!
//! Project deadline reminders fire "N days before the deadline", but at a
//! predictable time of day (e.g. 10:30) rather than the deadline's own clock
//! time.

use chrono::{DateTime, TimeZone, Utc};

use crate::calendar::CalendarResolver;
use crate::error::{ConfigError, ScheduleError};

/// Rewrites the time-of-day component of a date.
pub trait TimeSetter: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ScheduleError::AnchorUnrepresentable`] if the configured time
    /// does not exist on that local date.
    fn set_time(&self, date: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError>;
}

#[derive(Debug, Clone)]
pub struct DateAnchor {
    calendar: CalendarResolver,
    hour: u32,
    minute: u32,
}

impl DateAnchor {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an hour above 23 or a minute
    /// above 59.
    pub fn new(calendar: CalendarResolver, hour: u32, minute: u32) -> Result<Self, ConfigError> {
        if hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "project_anchor.hour".to_string(),
                message: format!("{hour} is outside 0-23"),
            });
        }
        if minute > 59 {
            return Err(ConfigError::InvalidValue {
                key: "project_anchor.minute".to_string(),
                message: format!("{minute} is outside 0-59"),
            });
        }
        Ok(Self {
            calendar,
            hour,
            minute,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl TimeSetter for DateAnchor {
    fn set_time(&self, date: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        let tz = self.calendar.resolve();
        let local_date = date.with_timezone(&tz).date_naive();
        let unrepresentable = || ScheduleError::AnchorUnrepresentable {
            date: local_date,
            hour: self.hour,
            minute: self.minute,
        };

        let naive = local_date
            .and_hms_opt(self.hour, self.minute, 0)
            .ok_or_else(unrepresentable)?;

        // Ambiguous local times (DST fall-back) resolve to the earlier instant.
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(unrepresentable)
    }
}
