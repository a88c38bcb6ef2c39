//! Quiet hours (do-not-disturb) policy.
//!
//! Quiet hours are a set of whole clock hours in which no notification may
//! be scheduled to fire. There is no minute-level granularity: if 22 is
//! forbidden, every instant from 22:00:00 to 22:59:59 local time is blocked.

use std::collections::BTreeSet;

use chrono::{DateTime, Timelike, Utc};

use crate::calendar::CalendarResolver;
use crate::error::ConfigError;

/// Decides whether a candidate fire date is allowed.
pub trait DoNotDisturbPolicy: Send + Sync {
    fn is_satisfied(&self, date: DateTime<Utc>) -> bool;
}

/// Forbidden-hour policy evaluated in the resolver's current timezone.
#[derive(Debug, Clone)]
pub struct QuietHoursPolicy {
    forbidden_hours: BTreeSet<u32>,
    calendar: CalendarResolver,
}

impl QuietHoursPolicy {
    /// Create a policy from an explicit set of forbidden hours (0-23).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any hour is 24 or above.
    pub fn new(
        forbidden_hours: impl IntoIterator<Item = u32>,
        calendar: CalendarResolver,
    ) -> Result<Self, ConfigError> {
        let forbidden_hours: BTreeSet<u32> = forbidden_hours.into_iter().collect();
        if let Some(hour) = forbidden_hours.iter().find(|hour| **hour > 23) {
            return Err(ConfigError::InvalidValue {
                key: "quiet_hours.forbidden_hours".to_string(),
                message: format!("hour {hour} is outside 0-23"),
            });
        }
        Ok(Self {
            forbidden_hours,
            calendar,
        })
    }

    /// Build the forbidden set from a `[start, end)` window.
    ///
    /// Overnight windows wrap midnight (22 -> 6 forbids 22, 23, 0..=5).
    /// `start == end` forbids nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if either bound is above 23.
    pub fn from_window(
        start_hour: u32,
        end_hour: u32,
        calendar: CalendarResolver,
    ) -> Result<Self, ConfigError> {
        if start_hour > 23 || end_hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "quiet_hours.window".to_string(),
                message: format!("window {start_hour}-{end_hour} is outside 0-23"),
            });
        }

        let hours: Vec<u32> = if start_hour > end_hour {
            (start_hour..24).chain(0..end_hour).collect()
        } else {
            (start_hour..end_hour).collect()
        };
        Self::new(hours, calendar)
    }

    /// Policy with no forbidden hours.
    pub fn allow_all(calendar: CalendarResolver) -> Self {
        Self {
            forbidden_hours: BTreeSet::new(),
            calendar,
        }
    }

    pub fn forbidden_hours(&self) -> impl Iterator<Item = u32> + '_ {
        self.forbidden_hours.iter().copied()
    }

    /// Hour of day of `date` in the currently resolved timezone.
    pub fn local_hour(&self, date: DateTime<Utc>) -> u32 {
        date.with_timezone(&self.calendar.resolve()).hour()
    }
}

impl DoNotDisturbPolicy for QuietHoursPolicy {
    fn is_satisfied(&self, date: DateTime<Utc>) -> bool {
        !self.forbidden_hours.contains(&self.local_hour(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn night_policy() -> QuietHoursPolicy {
        QuietHoursPolicy::new([22, 23, 0, 1, 2, 3, 4, 5], CalendarResolver::utc()).unwrap()
    }

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_forbidden_hour_is_not_satisfied() {
        assert!(!night_policy().is_satisfied(at_hour(23)));
    }

    #[test]
    fn test_allowed_hour_is_satisfied() {
        assert!(night_policy().is_satisfied(at_hour(12)));
    }

    #[test]
    fn test_empty_set_is_always_satisfied() {
        let policy = QuietHoursPolicy::allow_all(CalendarResolver::utc());
        for hour in 0..24 {
            assert!(policy.is_satisfied(at_hour(hour)));
        }
    }

    #[test]
    fn test_rejects_out_of_range_hour() {
        let result = QuietHoursPolicy::new([7, 24], CalendarResolver::utc());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_overnight_window_wraps_midnight() {
        let policy = QuietHoursPolicy::from_window(22, 6, CalendarResolver::utc()).unwrap();
        let hours: Vec<u32> = policy.forbidden_hours().collect();
        assert_eq!(hours, vec![0, 1, 2, 3, 4, 5, 22, 23]);
    }

    #[test]
    fn test_daytime_window() {
        let policy = QuietHoursPolicy::from_window(12, 14, CalendarResolver::utc()).unwrap();
        assert!(!policy.is_satisfied(at_hour(12)));
        assert!(!policy.is_satisfied(at_hour(13)));
        assert!(policy.is_satisfied(at_hour(14)));
    }

    #[test]
    fn test_equal_window_bounds_forbid_nothing() {
        let policy = QuietHoursPolicy::from_window(9, 9, CalendarResolver::utc()).unwrap();
        assert_eq!(policy.forbidden_hours().count(), 0);
    }

    #[test]
    fn test_hour_is_read_in_resolved_timezone() {
        // 21:00 UTC is 23:00 in Berlin during summer time
        let policy =
            QuietHoursPolicy::new([23], CalendarResolver::fixed(chrono_tz::Europe::Berlin)).unwrap();
        assert!(!policy.is_satisfied(at_hour(21)));
        assert!(policy.is_satisfied(at_hour(23)));
    }

    proptest! {
        #[test]
        fn prop_satisfied_iff_hour_not_forbidden(
            forbidden in prop::collection::btree_set(0u32..24, 0..24),
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
        ) {
            let policy = QuietHoursPolicy::new(forbidden.clone(), CalendarResolver::utc()).unwrap();
            let date = at_hour(hour) + Duration::minutes(minute as i64) + Duration::seconds(second as i64);
            prop_assert_eq!(policy.is_satisfied(date), !forbidden.contains(&hour));
        }
    }
}
