//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/signup {"name":"Alice","username":"alice","email":"alice@example.com","password":"secret1"}
//! POST /api/v1/auth/login  {"username":"alice","password":"secret1"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    AuthResponse, LoginRequest, MessageResponse, SignupRequest, UserResponse,
};
use crate::inbound::http::session::{SessionContext, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_login_validation_error, map_registration_validation_error,
};

/// Create an account and sign the new user in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid or duplicate signup", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())
        .map_err(|err| map_registration_validation_error(&err))?;
    let authenticated = state.accounts.register(registration).await?;
    session.persist(&authenticated.session)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".to_owned(),
        user: authenticated.user.into(),
    }))
}

/// Verify credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing fields or invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(&err))?;
    let authenticated = state.accounts.login(credentials).await?;
    session.persist(&authenticated.session)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Logged in successfully".to_owned(),
        user: authenticated.user.into(),
    }))
}

/// Clear the session cookie. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> web::Json<MessageResponse> {
    session.purge();
    web::Json(MessageResponse::new("Logged out successfully"))
}

/// The signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, expired or unknown session", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user = require_user(&session, state.accounts.as_ref()).await?;
    Ok(web::Json(user.into()))
}
