//! Shared Diesel error classification for the repositories.
//!
//! Each repository supplies constructors for its port's error enum; this
//! module decides which one applies.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    NotificationPersistenceError, PostPersistenceError, UserPersistenceError,
};

use super::pool::PoolError;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Classification of a Diesel failure, independent of any port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    Connection(&'static str),
    Query(&'static str),
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation,
}

pub(crate) fn classify(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DieselFailure::ForeignKeyViolation
        }
        _ => DieselFailure::Query("database error"),
    }
}

pub(crate) fn map_user_diesel_error(error: DieselError) -> UserPersistenceError {
    match classify(&error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation { constraint } => match constraint.as_deref() {
            Some(USERNAME_CONSTRAINT) => UserPersistenceError::duplicate("username"),
            Some(EMAIL_CONSTRAINT) => UserPersistenceError::duplicate("email"),
            _ => UserPersistenceError::query("unique constraint violated"),
        },
        DieselFailure::ForeignKeyViolation => {
            UserPersistenceError::query("foreign key constraint violated")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

/// Map a post repository failure; `post_id` names the post an insert
/// referenced, so a foreign key violation means it has been deleted.
pub(crate) fn map_post_diesel_error(error: DieselError, post_id: &str) -> PostPersistenceError {
    match classify(&error) {
        DieselFailure::Connection(message) => PostPersistenceError::connection(message),
        DieselFailure::ForeignKeyViolation => PostPersistenceError::post_not_found(post_id),
        DieselFailure::UniqueViolation { .. } => {
            PostPersistenceError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => PostPersistenceError::query(message),
    }
}

pub(crate) fn map_notification_diesel_error(error: DieselError) -> NotificationPersistenceError {
    match classify(&error) {
        DieselFailure::Connection(message) => NotificationPersistenceError::connection(message),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation => {
            NotificationPersistenceError::query("constraint violated")
        }
        DieselFailure::Query(message) => NotificationPersistenceError::query(message),
    }
}

pub(crate) fn map_user_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

pub(crate) fn map_post_pool_error(error: PoolError) -> PostPersistenceError {
    PostPersistenceError::connection(error.into_message())
}

pub(crate) fn map_notification_pool_error(error: PoolError) -> NotificationPersistenceError {
    NotificationPersistenceError::connection(error.into_message())
}
