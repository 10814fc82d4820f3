//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose details carry the
//! offending `field` and a stable `code`.

use actix_web::error::JsonPayloadError;
use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, PostValidationError, RegistrationValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    Empty,
    TooShort,
    TooLong,
    Invalid,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::Empty => "empty",
            ErrorCode::TooShort => "too_short",
            ErrorCode::TooLong => "too_long",
            ErrorCode::Invalid => "invalid",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

fn field_error(message: impl Into<String>, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Map body decoding failures (malformed JSON, unknown profile fields) to a
/// client error instead of Actix's plain-text default.
pub(crate) fn json_payload_error(error: &JsonPayloadError) -> Error {
    let detail = match error {
        JsonPayloadError::Deserialize(inner) => inner.to_string(),
        JsonPayloadError::ContentType => "expected application/json".to_owned(),
        other => other.to_string(),
    };
    Error::invalid_request("Invalid request body").with_details(json!({
        "code": ErrorCode::InvalidBody.as_str(),
        "reason": detail,
    }))
}

fn user_error_code(error: &UserValidationError) -> ErrorCode {
    match error {
        UserValidationError::EmptyName
        | UserValidationError::EmptyUsername
        | UserValidationError::EmptyEmail
        | UserValidationError::EmptyField { .. } => ErrorCode::Empty,
        UserValidationError::UsernameTooShort { .. } => ErrorCode::TooShort,
        UserValidationError::NameTooLong { .. }
        | UserValidationError::UsernameTooLong { .. }
        | UserValidationError::FieldTooLong { .. } => ErrorCode::TooLong,
        UserValidationError::UsernameInvalidCharacters | UserValidationError::InvalidEmail => {
            ErrorCode::Invalid
        }
    }
}

pub(crate) fn map_user_validation_error(error: &UserValidationError) -> Error {
    field_error(error.to_string(), error.field(), user_error_code(error).as_str())
}

pub(crate) fn map_login_validation_error(error: &LoginValidationError) -> Error {
    field_error(
        "Username and password are required",
        error.field(),
        ErrorCode::MissingField.as_str(),
    )
}

pub(crate) fn map_registration_validation_error(error: &RegistrationValidationError) -> Error {
    match error {
        RegistrationValidationError::MissingFields => Error::invalid_request(error.to_string())
            .with_details(json!({ "code": ErrorCode::MissingField.as_str() })),
        RegistrationValidationError::Invalid(inner) => map_user_validation_error(inner),
        RegistrationValidationError::PasswordTooShort { .. } => field_error(
            error.to_string(),
            "password",
            ErrorCode::TooShort.as_str(),
        ),
    }
}

pub(crate) fn map_post_validation_error(error: &PostValidationError) -> Error {
    field_error(error.to_string(), error.field(), error.code())
}
