use crate::model::{Notification, UserId};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Sink for order, assignment and stock events.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn emit(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Hands `notification` to the sink. A failed delivery is logged and dropped; it never
/// undoes the state change that produced it.
pub async fn emit_quietly(notifier: &dyn Notifier, notification: Notification) {
    let target = notification.target_user_id.clone();
    if let Err(e) = notifier.emit(notification).await {
        warn!(%target, error = %e, "Notification dropped");
    }
}

/// Logs every event at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn emit(&self, n: Notification) -> Result<(), NotifyError> {
        info!(target_user = %n.target_user_id, kind = ?n.kind, title = %n.title, "{}", n.message);
        Ok(())
    }
}

/// Keeps every event in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records nothing and rejects every event.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn for_user(&self, user_id: &UserId) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter(|n| &n.target_user_id == user_id)
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn emit(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.failing {
            return Err(NotifyError("sink offline".into()));
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
        Ok(())
    }
}
