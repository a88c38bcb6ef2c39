//! Gateway adapter enforcing quiet hours on top of a notification store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{AuthorizationStatus, NotificationCenter, NotificationGateway};
use crate::content::ScheduledNotificationRequest;
use crate::error::GatewayError;
use crate::policy::DoNotDisturbPolicy;

/// Production [`NotificationGateway`].
///
/// Every `set_notification` is checked against the do-not-disturb policy
/// first; a rejected fire date never reaches the store.
pub struct PolicyGateway<C> {
    center: C,
    policy: Arc<dyn DoNotDisturbPolicy>,
}

impl<C: NotificationCenter> PolicyGateway<C> {
    /// Compose a gateway from a store and the policy it must honour.
    pub fn compose(center: C, policy: impl DoNotDisturbPolicy + 'static) -> Self {
        Self {
            center,
            policy: Arc::new(policy),
        }
    }

    pub fn center(&self) -> &C {
        &self.center
    }
}

#[async_trait]
impl<C: NotificationCenter> NotificationGateway for PolicyGateway<C> {
    async fn request_authorization(&self) -> Result<bool, GatewayError> {
        self.center.request_authorization().await
    }

    async fn check_authorization_status(&self) -> AuthorizationStatus {
        AuthorizationStatus::from_platform(self.center.authorization_status().await)
    }

    async fn set_notification(
        &self,
        request: ScheduledNotificationRequest,
    ) -> Result<(), GatewayError> {
        let fire_date = request.fire_date();
        if !self.policy.is_satisfied(fire_date) {
            debug!(id = request.id(), %fire_date, "fire date rejected by quiet hours");
            return Err(GatewayError::ForbiddenHour { fire_date });
        }

        let id = request.id().to_string();
        self.center.add(request).await?;
        info!(id = %id, %fire_date, "notification scheduled");
        Ok(())
    }

    async fn remove_pending_notifications(&self, ids: &[String]) {
        debug!(?ids, "removing pending notifications");
        self.center.remove_pending(ids).await;
    }
}
