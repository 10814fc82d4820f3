//! Records engagement notifications for post authors.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::NotificationRepository;
use crate::domain::port_errors::map_notification_error;
use crate::domain::{Error, Notification, NotificationId, NotificationKind, PostId, UserId};

/// Persists a notification whenever someone engages with another user's post.
pub struct NotificationEmitter<N> {
    repo: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<N> NotificationEmitter<N> {
    /// Emit into `repo`, stamping notifications with `clock`.
    pub fn new(repo: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<N> NotificationEmitter<N>
where
    N: NotificationRepository,
{
    /// Record that `actor` did `kind` on `recipient`'s post.
    ///
    /// Returns `None` without touching the store when the actor is the
    /// recipient. Repeated events are not deduplicated.
    pub async fn emit(
        &self,
        recipient: UserId,
        kind: NotificationKind,
        actor: UserId,
        post: PostId,
    ) -> Result<Option<Notification>, Error> {
        if recipient == actor {
            return Ok(None);
        }
        let notification = Notification {
            id: NotificationId::random(),
            recipient,
            kind,
            actor,
            post: Some(post),
            read: false,
            created_at: self.clock.utc(),
        };
        self.repo
            .insert(&notification)
            .await
            .map_err(map_notification_error)?;
        debug!(
            notification_id = %notification.id,
            recipient = %recipient,
            kind = %kind,
            "notification recorded"
        );
        Ok(Some(notification))
    }
}
