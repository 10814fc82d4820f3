//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure_api`] registers every handler; callers mount it under
//! `/api/v1` behind the session middleware.

use actix_web::web;

pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod posts;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

/// Upper bound for JSON bodies; post images arrive inline as data URLs.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// JSON extractor configuration turning decode failures into API errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| validation::json_payload_error(&err).into())
}

/// Register all API routes on `cfg`.
///
/// Literal post routes are registered before `/posts/{id}` so they are not
/// captured by the id pattern.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(posts::feed)
        .service(posts::create_post)
        .service(posts::delete_post)
        .service(posts::user_posts)
        .service(posts::get_post)
        .service(posts::add_comment)
        .service(posts::toggle_like)
        .service(users::update_profile)
        .service(users::get_profile)
        .service(health::ready)
        .service(health::live);
}
