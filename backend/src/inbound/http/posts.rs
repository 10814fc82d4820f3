//! Post, comment and like API handlers.
//!
//! ```text
//! GET    /api/v1/posts
//! POST   /api/v1/posts/create {"content":"Hello world","image":"data:image/png;base64,..."}
//! DELETE /api/v1/posts/delete/{id}
//! GET    /api/v1/posts/user/{username}
//! GET    /api/v1/posts/{id}
//! POST   /api/v1/posts/{id}/comment {"content":"Nice!"}
//! POST   /api/v1/posts/{id}/like
//! ```
//!
//! Every route requires a live session.

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::{CommentContent, Error, PostDraft, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CommentRequest, CreatePostRequest, MessageResponse, PostResponse};
use crate::inbound::http::session::{SessionContext, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_post_validation_error;

/// Malformed ids cannot name an existing post.
fn post_id(raw: &str) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|_| Error::not_found("Post not found"))
}

fn post_list(posts: Vec<crate::domain::Post>) -> web::Json<Vec<PostResponse>> {
    web::Json(posts.into_iter().map(PostResponse::from).collect())
}

/// Posts by the caller and their connections, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Feed", body = [PostResponse]),
        (status = 401, description = "Missing or expired session", body = Error)
    ),
    tags = ["posts"],
    operation_id = "feed"
)]
#[get("/posts")]
pub async fn feed(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let viewer = require_user(&session, state.accounts.as_ref()).await?;
    Ok(post_list(state.posts_query.feed(&viewer.id).await?))
}

/// Publish a post with text, an image, or both.
#[utoipa::path(
    post,
    path = "/api/v1/posts/create",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Empty post, content too long or malformed image", body = Error),
        (status = 401, description = "Missing or expired session", body = Error),
        (status = 500, description = "Image upload failed", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts/create")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let author = require_user(&session, state.accounts.as_ref()).await?;
    let CreatePostRequest { content, image } = payload.into_inner();
    let draft = PostDraft::try_new(content.as_deref(), image.as_deref())
        .map_err(|err| map_post_validation_error(&err))?;
    let post = state.posts.create_post(&author.id, draft).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Delete one of the caller's posts.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/delete/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 401, description = "Missing or expired session", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/delete/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let requester = require_user(&session, state.accounts.as_ref()).await?;
    let id = post_id(&path)?;
    state.posts.delete_post(&id, &requester.id).await?;
    Ok(web::Json(MessageResponse::new("Post deleted successfully")))
}

/// Posts written by `username`, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/user/{username}",
    params(("username" = String, Path, description = "Author's username")),
    responses(
        (status = 200, description = "Posts by the user", body = [PostResponse]),
        (status = 401, description = "Missing or expired session", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "userPosts"
)]
#[get("/posts/user/{username}")]
pub async fn user_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PostResponse>>> {
    require_user(&session, state.accounts.as_ref()).await?;
    Ok(post_list(state.posts_query.user_posts(&path).await?))
}

/// A single post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 401, description = "Missing or expired session", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostResponse>> {
    require_user(&session, state.accounts.as_ref()).await?;
    let id = post_id(&path)?;
    Ok(web::Json(state.posts_query.post(&id).await?.into()))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comment",
    params(("id" = String, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 400, description = "Empty or overlong comment", body = Error),
        (status = 401, description = "Missing or expired session", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/posts/{id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let author = require_user(&session, state.accounts.as_ref()).await?;
    let content =
        CommentContent::new(&payload.content).map_err(|err| map_post_validation_error(&err))?;
    let id = post_id(&path)?;
    let post = state.posts.add_comment(&id, &author.id, content).await?;
    Ok(web::Json(post.into()))
}

/// Like a post, or unlike it when already liked.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 401, description = "Missing or expired session", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "toggleLike"
)]
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostResponse>> {
    let user = require_user(&session, state.accounts.as_ref()).await?;
    let id = post_id(&path)?;
    Ok(web::Json(state.posts.toggle_like(&id, &user.id).await?.into()))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
