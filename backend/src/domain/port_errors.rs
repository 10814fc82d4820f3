//! Conversions from driven-port errors into domain [`Error`]s.
//!
//! Connection failures become `service_unavailable`; anything else a store
//! reports is an internal error whose text is logged but never shown to
//! clients.

use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{
    NotificationPersistenceError, PasswordHashError, PostPersistenceError, UserPersistenceError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => duplicate_user_field(&field),
    }
}

/// Duplicate-account error naming the clashing field.
pub(crate) fn duplicate_user_field(field: &str) -> Error {
    let message = match field {
        "email" => "Email already exists",
        "username" => "Username already exists",
        _ => "Account already exists",
    };
    Error::duplicate(message).with_details(json!({
        "field": field,
        "code": "duplicate",
    }))
}

pub(crate) fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostPersistenceError::PostNotFound { .. } => post_not_found(),
    }
}

pub(crate) fn post_not_found() -> Error {
    Error::not_found("Post not found")
}

pub(crate) fn user_not_found() -> Error {
    Error::not_found("User not found")
}

pub(crate) fn map_notification_error(error: NotificationPersistenceError) -> Error {
    match error {
        NotificationPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationPersistenceError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[case(UserPersistenceError::duplicate("email"), ErrorCode::Duplicate)]
    fn user_errors_map_to_codes(#[case] error: UserPersistenceError, #[case] code: ErrorCode) {
        assert_eq!(map_user_error(error).code(), code);
    }

    #[rstest]
    #[case("email", "Email already exists")]
    #[case("username", "Username already exists")]
    fn duplicates_name_the_field(#[case] field: &str, #[case] message: &str) {
        let error = map_user_error(UserPersistenceError::duplicate(field));
        assert_eq!(error.message(), message);
        assert_eq!(error.details(), Some(&json!({"field": field, "code": "duplicate"})));
    }

    #[rstest]
    #[case(PostPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(PostPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[case(PostPersistenceError::post_not_found("abc"), ErrorCode::NotFound)]
    fn post_errors_map_to_codes(#[case] error: PostPersistenceError, #[case] code: ErrorCode) {
        assert_eq!(map_post_error(error).code(), code);
    }

    #[rstest]
    fn notification_connection_errors_are_unavailable() {
        let error = map_notification_error(NotificationPersistenceError::connection("down"));
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
