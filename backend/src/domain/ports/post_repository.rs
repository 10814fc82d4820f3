//! Port for the post store: posts, their comments and like sets.
//!
//! Reads always return fully populated [`Post`] values (author summary,
//! comments with their authors, likes). Feed listings are newest first.

use async_trait::async_trait;

use crate::domain::{LikeToggle, NewComment, NewPost, Post, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// The referenced post vanished between lookup and mutation.
        PostNotFound { post_id: String } => "post not found: {post_id}",
    }
}

/// Persistence port for posts, comments and likes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post without comments or likes.
    async fn insert(&self, post: &NewPost) -> Result<(), PostPersistenceError>;

    /// Fetch a populated post by identifier.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// List posts written by any of `authors`, newest first.
    async fn list_by_authors(&self, authors: &[UserId]) -> Result<Vec<Post>, PostPersistenceError>;

    /// Remove a post with its comments and likes. Returns `false` when the
    /// post did not exist.
    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError>;

    /// Append a comment to an existing post.
    ///
    /// Fails with [`PostPersistenceError::PostNotFound`] when the post is gone.
    async fn add_comment(&self, comment: &NewComment) -> Result<(), PostPersistenceError>;

    /// Atomically flip `user`'s membership in the post's like set.
    ///
    /// Fails with [`PostPersistenceError::PostNotFound`] when the post is gone.
    async fn toggle_like(
        &self,
        post: &PostId,
        user: &UserId,
    ) -> Result<LikeToggle, PostPersistenceError>;
}
