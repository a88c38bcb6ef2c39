//! # Tallyclock Core Library
//!
//! Reminder scheduling for a personal time-tracking application. The crate
//! decides whether, when, and under which id a local reminder fires, and
//! hands the result to a notification store through a gateway trait.
//!
//! ## Architecture
//!
//! - **Engine**: Stateless scheduler turning domain events (timer start/stop,
//!   project added/deleted) into schedule and cancel calls
//! - **Policy**: Quiet hours and the project reminder time-of-day anchor
//! - **Gateway**: Async notification capability, with a quiet-hours adapter
//!   and an in-memory store
//! - **Config**: TOML configuration for timezone, quiet hours and reminders
//!
//! ## Key Components
//!
//! - [`SchedulingEngine`]: Reminder scheduling rules
//! - [`NotificationGateway`]: Authorization, schedule and cancel
//! - [`QuietHoursPolicy`]: Forbidden hours of the day
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod events;
pub mod gateway;
pub mod policy;
pub mod settings;

pub use calendar::CalendarResolver;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use content::{NotificationContent, ScheduledNotificationRequest};
pub use engine::SchedulingEngine;
pub use error::{ConfigError, CoreError, GatewayError, ScheduleError};
pub use events::{ProjectEvent, ReminderEvent, TimerSnapshot};
pub use gateway::{
    AuthorizationStatus, InMemoryNotificationCenter, NotificationCenter, NotificationGateway,
    PolicyGateway, RecordingGateway,
};
pub use policy::{DateAnchor, DoNotDisturbPolicy, QuietHoursPolicy, TimeSetter};
pub use settings::{ConfiguredSettings, ReminderKey, ReminderSetting, ReminderSettings};
