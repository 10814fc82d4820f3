//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Types validate on construction; document invariants and serialisation
//! contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User, Post, Notification — aggregates persisted by the store ports.
//! - SessionIssuer, EngagementService, ProfileService — port implementations.

pub mod auth;
pub mod collaborators;
pub mod engagement_service;
pub mod error;
pub mod identifier;
pub mod links;
pub mod notification;
pub mod notification_emitter;
pub(crate) mod port_errors;
pub mod ports;
pub mod post;
pub mod profile_service;
pub mod session;
pub mod session_issuer;
pub(crate) mod side_effects;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, PasswordHash, Registration,
    RegistrationValidationError,
};
pub use self::collaborators::ServiceCollaborators;
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identifier::IdentifierValidationError;
pub use self::links::{AppLinks, InvalidClientUrl};
pub use self::notification::{
    Notification, NotificationId, NotificationKind, UnknownNotificationKind,
};
pub use self::notification_emitter::NotificationEmitter;
pub use self::post::{
    COMMENT_CONTENT_MAX, Comment, CommentContent, CommentId, ImageDataUrl, LikeToggle,
    NewComment, NewPost, POST_CONTENT_MAX, Post, PostDraft, PostId, PostValidationError,
};
pub use self::profile_service::ProfileService;
pub use self::session::{SESSION_TTL_DAYS, SessionClaims, session_ttl};
pub use self::session_issuer::SessionIssuer;
pub use self::trace_id::TraceId;
pub use self::user::{
    EducationEntry, EmailAddress, ExperienceEntry, PersonName, Profile, ProfileDraft,
    ProfileUpdate, User, UserId, UserSummary, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use proflink::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
