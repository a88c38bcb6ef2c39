//! Call-recording gateway decorator.
//!
//! Wraps another gateway and keeps an ordered log of every schedule and
//! cancel call together with its outcome. Each instance owns its own log.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{AuthorizationStatus, NotificationGateway};
use crate::content::ScheduledNotificationRequest;
use crate::error::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Set {
        request: ScheduledNotificationRequest,
        outcome: Result<(), GatewayError>,
    },
    Remove {
        ids: Vec<String>,
    },
}

pub struct RecordingGateway<G> {
    inner: G,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl<G: NotificationGateway> RecordingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    /// Requests passed to `set_notification`, in call order, whatever
    /// their outcome.
    pub fn set_requests(&self) -> Vec<ScheduledNotificationRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Set { request, .. } => Some(request.clone()),
                GatewayCall::Remove { .. } => None,
            })
            .collect()
    }

    /// Id lists passed to `remove_pending_notifications`, in call order.
    pub fn removed_ids(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Remove { ids } => Some(ids.clone()),
                GatewayCall::Set { .. } => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl<G: NotificationGateway> NotificationGateway for RecordingGateway<G> {
    async fn request_authorization(&self) -> Result<bool, GatewayError> {
        self.inner.request_authorization().await
    }

    async fn check_authorization_status(&self) -> AuthorizationStatus {
        self.inner.check_authorization_status().await
    }

    async fn set_notification(
        &self,
        request: ScheduledNotificationRequest,
    ) -> Result<(), GatewayError> {
        let outcome = self.inner.set_notification(request.clone()).await;
        self.calls.lock().push(GatewayCall::Set {
            request,
            outcome: outcome.clone(),
        });
        outcome
    }

    async fn remove_pending_notifications(&self, ids: &[String]) {
        self.inner.remove_pending_notifications(ids).await;
        self.calls.lock().push(GatewayCall::Remove { ids: ids.to_vec() });
    }
}
