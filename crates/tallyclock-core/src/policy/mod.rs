//! Time-of-day policies applied to candidate fire dates.
//!
//! - [`QuietHoursPolicy`] rejects fire dates inside forbidden clock hours.
//! - [`DateAnchor`] pins a date to a fixed daily time (project reminders).

pub mod anchor;
pub mod quiet_hours;

pub use anchor::{DateAnchor, TimeSetter};
pub use quiet_hours::{DoNotDisturbPolicy, QuietHoursPolicy};
