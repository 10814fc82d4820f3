//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{NotificationPersistenceError, NotificationRepository};
use crate::domain::{Notification, NotificationId, NotificationKind, PostId, UserId};

use super::error_mapping::{map_notification_diesel_error, map_notification_pool_error};
use super::models::NotificationRow;
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn notification_to_row(notification: &Notification) -> NotificationRow {
    NotificationRow {
        id: *notification.id.as_uuid(),
        recipient_id: *notification.recipient.as_uuid(),
        kind: notification.kind.as_str().to_owned(),
        actor_id: *notification.actor.as_uuid(),
        post_id: notification.post.map(|post| *post.as_uuid()),
        read: notification.read,
        created_at: notification.created_at,
    }
}

/// Rows with a kind this build does not know are skipped.
fn row_to_notification(row: NotificationRow) -> Option<Notification> {
    let kind = match row.kind.parse::<NotificationKind>() {
        Ok(kind) => kind,
        Err(err) => {
            warn!(notification_id = %row.id, %err, "skipping notification of unknown kind");
            return None;
        }
    };
    Some(Notification {
        id: NotificationId::from_uuid(row.id),
        recipient: UserId::from_uuid(row.recipient_id),
        kind,
        actor: UserId::from_uuid(row.actor_id),
        post: row.post_id.map(PostId::from_uuid),
        read: row.read,
        created_at: row.created_at,
    })
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationPersistenceError> {
        let row = notification_to_row(notification);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_notification_pool_error)?;
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_notification_diesel_error)
    }

    async fn list_for_recipient(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_notification_pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::recipient_id.eq(recipient.as_uuid()))
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_notification_diesel_error)?;
        Ok(rows.into_iter().filter_map(row_to_notification).collect())
    }
}
