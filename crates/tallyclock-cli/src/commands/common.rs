//! Shared plumbing: config loading and engine composition.

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tallyclock_core::config::data_dir;
use tallyclock_core::{
    Config, ConfigError, InMemoryNotificationCenter, NotificationCenter, NotificationGateway,
    PolicyGateway, SchedulingEngine,
};

pub type CliResult = Result<(), Box<dyn Error>>;

pub type Engine = SchedulingEngine<PolicyGateway<InMemoryNotificationCenter>>;

/// Load the config at `path`, or the default location when unset.
///
/// An explicit path that does not exist yields the defaults without
/// touching the filesystem.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) if path.exists() => Config::load_from(path),
        Some(_) => Ok(Config::default()),
        None => Config::load(),
    }
}

pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => config.save_to(path),
        None => config.save(),
    }
}

pub fn config_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::path(),
    }
}

pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map_err(|e| format!("invalid date-time '{value}': {e}"))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Pending-store snapshot location: next to an explicit config file,
/// otherwise in the data directory.
pub fn store_path(config: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match config {
        Some(path) => Ok(path.with_file_name(PENDING_FILE)),
        None => Ok(data_dir()?.join(PENDING_FILE)),
    }
}

const PENDING_FILE: &str = "pending.json";

/// An engine over the in-memory store restored from the pending snapshot.
pub struct Session {
    pub engine: Engine,
    center: InMemoryNotificationCenter,
    store: PathBuf,
}

impl Session {
    /// Compose the engine from config and obtain notification permission.
    pub async fn open(config_path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let config = load_config(config_path)?;
        let store = store_path(config_path)?;
        let center = InMemoryNotificationCenter::load_snapshot(&store)?;
        let delivered = center.drop_delivered(Utc::now());
        tracing::debug!(delivered, "dropped delivered notifications");

        let gateway = PolicyGateway::compose(center.clone(), config.quiet_hours_policy()?);
        let engine = SchedulingEngine::new(gateway, config.settings()?, config.project_anchor()?)
            .with_instant_delay(config.instant_delay());

        if !engine.gateway().request_authorization().await? {
            return Err("notification permission denied".into());
        }
        tracing::debug!(
            status = ?engine.gateway().check_authorization_status().await,
            "notification store ready"
        );

        Ok(Self {
            engine,
            center,
            store,
        })
    }

    /// Save the pending set and print it as JSON, ordered by fire date.
    pub async fn finish(self) -> CliResult {
        self.center.save_snapshot(&self.store).await?;
        let pending = self.center.pending().await;
        println!("{}", serde_json::to_string_pretty(&pending)?);
        Ok(())
    }
}
