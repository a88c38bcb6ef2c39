//! In-memory notification store.
//!
//! Holds pending requests keyed by id, the same shape as the OS store. The
//! CLI runs against it, persisting the pending set as a JSON snapshot between
//! invocations, and tests use it to observe the pending set. Every instance
//! owns its own state; fault injection is configured per instance.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use super::{NotificationCenter, PlatformAuthorizationStatus};
use crate::content::ScheduledNotificationRequest;
use crate::error::{CoreError, GatewayError};

#[derive(Debug)]
struct CenterState {
    pending: BTreeMap<String, ScheduledNotificationRequest>,
    status: PlatformAuthorizationStatus,
    grant_on_request: bool,
    authorization_error: Option<String>,
    add_error: Option<String>,
    authorization_requests: usize,
}

/// Pending-request store with an implicit "does not exist" default per id.
#[derive(Debug, Clone)]
pub struct InMemoryNotificationCenter {
    state: Arc<Mutex<CenterState>>,
}

impl InMemoryNotificationCenter {
    /// Store whose permission prompt has not been answered yet; a request
    /// will be granted.
    pub fn new() -> Self {
        Self::with_status(PlatformAuthorizationStatus::NotDetermined, true)
    }

    /// Store that is already authorized.
    pub fn authorized() -> Self {
        Self::with_status(PlatformAuthorizationStatus::Authorized, true)
    }

    pub fn with_status(status: PlatformAuthorizationStatus, grant_on_request: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(CenterState {
                pending: BTreeMap::new(),
                status,
                grant_on_request,
                authorization_error: None,
                add_error: None,
                authorization_requests: 0,
            })),
        }
    }

    /// Make every subsequent `add` fail with a system error.
    pub fn fail_adds_with(&self, message: impl Into<String>) {
        self.state.lock().add_error = Some(message.into());
    }

    /// Make every subsequent authorization request fail.
    pub fn fail_authorization_with(&self, message: impl Into<String>) {
        self.state.lock().authorization_error = Some(message.into());
    }

    pub fn authorization_requests(&self) -> usize {
        self.state.lock().authorization_requests
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.state.lock().pending.keys().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<ScheduledNotificationRequest> {
        self.state.lock().pending.get(id).cloned()
    }

    /// Store (not yet authorized) holding the requests of a snapshot file.
    /// A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_snapshot(path: &Path) -> Result<Self, CoreError> {
        let center = Self::new();
        if !path.exists() {
            return Ok(center);
        }

        let content = std::fs::read_to_string(path)?;
        let requests: Vec<ScheduledNotificationRequest> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), count = requests.len(), "loaded pending snapshot");
        center.state.lock().pending = requests
            .into_iter()
            .map(|request| (request.id().to_string(), request))
            .collect();
        Ok(center)
    }

    /// Write the pending requests to `path`, ordered by fire date.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub async fn save_snapshot(&self, path: &Path) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(&self.pending().await)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Drop requests whose fire date is not after `now`; the OS store
    /// forgets a notification once it has been delivered.
    pub fn drop_delivered(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.lock();
        let before = state.pending.len();
        state.pending.retain(|_, request| request.fire_date() > now);
        before - state.pending.len()
    }
}

impl Default for InMemoryNotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationCenter for InMemoryNotificationCenter {
    async fn request_authorization(&self) -> Result<bool, GatewayError> {
        let mut state = self.state.lock();
        state.authorization_requests += 1;
        if let Some(message) = &state.authorization_error {
            return Err(GatewayError::Authorization(message.clone()));
        }

        if state.status == PlatformAuthorizationStatus::NotDetermined {
            state.status = if state.grant_on_request {
                PlatformAuthorizationStatus::Authorized
            } else {
                PlatformAuthorizationStatus::Denied
            };
        }

        Ok(matches!(
            state.status,
            PlatformAuthorizationStatus::Authorized | PlatformAuthorizationStatus::Provisional
        ))
    }

    async fn authorization_status(&self) -> PlatformAuthorizationStatus {
        self.state.lock().status
    }

    async fn add(&self, request: ScheduledNotificationRequest) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        if let Some(message) = &state.add_error {
            return Err(GatewayError::System(message.clone()));
        }
        state.pending.insert(request.id().to_string(), request);
        Ok(())
    }

    async fn remove_pending(&self, ids: &[String]) {
        let mut state = self.state.lock();
        for id in ids {
            state.pending.remove(id);
        }
    }

    async fn pending(&self) -> Vec<ScheduledNotificationRequest> {
        let mut pending: Vec<_> = self.state.lock().pending.values().cloned().collect();
        pending.sort_by(|a, b| a.fire_date().cmp(&b.fire_date()).then_with(|| a.id().cmp(b.id())));
        pending
    }
}
