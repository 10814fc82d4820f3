//! Profile API handlers.
//!
//! ```text
//! GET /api/v1/users/{username}
//! PUT /api/v1/users/profile {"headline":"Staff Engineer","skills":["Rust"]}
//! ```

use actix_web::{get, put, web};

use crate::domain::{Error, ProfileDraft, ProfileUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ProfilePatchRequest, UserResponse};
use crate::inbound::http::session::{SessionContext, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_user_validation_error;

/// Public profile of `username`.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Missing or expired session", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/{username}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    require_user(&session, state.accounts.as_ref()).await?;
    let user = state.profile.profile(&path).await?;
    Ok(web::Json(user.into()))
}

/// Edit the caller's own profile. Omitted fields are left untouched.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = ProfilePatchRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Invalid or disallowed field", body = Error),
        (status = 401, description = "Missing or expired session", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfilePatchRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = require_user(&session, state.accounts.as_ref()).await?;
    let update = ProfileUpdate::try_from(ProfileDraft::from(payload.into_inner()))
        .map_err(|err| map_user_validation_error(&err))?;
    let updated = state.profile_command.update_profile(&user.id, update).await?;
    Ok(web::Json(updated.into()))
}
