pub mod anchor;
pub mod common;
pub mod config;
pub mod dispatch;
pub mod project;
pub mod quiet_hours;
pub mod timer;
pub mod trigger;
