//! Notification gateway: the boundary to the OS notification store.
//!
//! The engine talks to a [`NotificationGateway`]. The production adapter,
//! [`PolicyGateway`], sits on top of a [`NotificationCenter`] (the raw
//! store primitive) and enforces the quiet-hours policy before committing
//! a request.

pub mod memory;
pub mod policy_gateway;
pub mod recording;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::ScheduledNotificationRequest;
use crate::error::GatewayError;

pub use memory::InMemoryNotificationCenter;
pub use policy_gateway::PolicyGateway;
pub use recording::{GatewayCall, RecordingGateway};

/// Authorization state as reported to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationStatus {
    Authorized,
    NotDetermined,
    Denied,
}

/// Authorization state as reported by the platform store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlatformAuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    /// Quiet delivery granted without an explicit prompt.
    Provisional,
    /// Any status this crate does not know about.
    Unknown,
}

impl AuthorizationStatus {
    pub fn from_platform(status: PlatformAuthorizationStatus) -> Self {
        match status {
            PlatformAuthorizationStatus::NotDetermined => AuthorizationStatus::NotDetermined,
            PlatformAuthorizationStatus::Denied => AuthorizationStatus::Denied,
            PlatformAuthorizationStatus::Authorized | PlatformAuthorizationStatus::Provisional => {
                AuthorizationStatus::Authorized
            }
            PlatformAuthorizationStatus::Unknown => AuthorizationStatus::NotDetermined,
        }
    }
}

/// Raw notification store primitives.
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    async fn request_authorization(&self) -> Result<bool, GatewayError>;

    async fn authorization_status(&self) -> PlatformAuthorizationStatus;

    /// Add a pending request. A request with an existing id replaces it.
    async fn add(&self, request: ScheduledNotificationRequest) -> Result<(), GatewayError>;

    /// Remove pending requests by id. Unknown ids are ignored.
    async fn remove_pending(&self, ids: &[String]);

    async fn pending(&self) -> Vec<ScheduledNotificationRequest>;
}

/// Everything the scheduling engine needs from the delivery subsystem.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn request_authorization(&self) -> Result<bool, GatewayError>;

    async fn check_authorization_status(&self) -> AuthorizationStatus;

    /// # Errors
    ///
    /// [`GatewayError::ForbiddenHour`] if the fire date is in quiet hours,
    /// [`GatewayError::System`] if the store rejected the request.
    async fn set_notification(&self, request: ScheduledNotificationRequest)
        -> Result<(), GatewayError>;

    /// Unconditional and idempotent.
    async fn remove_pending_notifications(&self, ids: &[String]);
}

#[async_trait]
impl<G: NotificationGateway + ?Sized> NotificationGateway for Arc<G> {
    async fn request_authorization(&self) -> Result<bool, GatewayError> {
        (**self).request_authorization().await
    }

    async fn check_authorization_status(&self) -> AuthorizationStatus {
        (**self).check_authorization_status().await
    }

    async fn set_notification(
        &self,
        request: ScheduledNotificationRequest,
    ) -> Result<(), GatewayError> {
        (**self).set_notification(request).await
    }

    async fn remove_pending_notifications(&self, ids: &[String]) {
        (**self).remove_pending_notifications(ids).await
    }
}
