//! Notifications raised when someone engages with another user's post.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::identifier::define_uuid_id;
use super::post::PostId;
use super::user::UserId;

define_uuid_id!(
    /// Stable notification identifier.
    NotificationId,
    "notification id"
);

/// Kind of engagement that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Someone liked the recipient's post.
    Like,
    /// Someone commented on the recipient's post.
    Comment,
}

impl NotificationKind {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a stored notification kind is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNotificationKind(pub String);

impl fmt::Display for UnknownNotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown notification kind: {}", self.0)
    }
}

impl std::error::Error for UnknownNotificationKind {}

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "comment" => Ok(Self::Comment),
            other => Err(UnknownNotificationKind(other.to_owned())),
        }
    }
}

/// Notification delivered to `recipient` about `actor`'s action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification id.
    pub id: NotificationId,
    /// User being notified.
    pub recipient: UserId,
    /// What happened.
    pub kind: NotificationKind,
    /// User who acted.
    pub actor: UserId,
    /// Post the action concerned.
    pub post: Option<PostId>,
    /// Whether the recipient has seen it.
    pub read: bool,
    /// When it was emitted.
    pub created_at: DateTime<Utc>,
}
