//! Driving port for post mutations.

use async_trait::async_trait;

use crate::domain::{CommentContent, Error, Post, PostDraft, PostId, UserId};

/// Driving port for post mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Publish a post, uploading its image first when one is attached.
    async fn create_post(&self, author: &UserId, draft: PostDraft) -> Result<Post, Error>;

    /// Delete a post owned by `requester`.
    async fn delete_post(&self, post: &PostId, requester: &UserId) -> Result<(), Error>;

    /// Append a comment and notify the post author.
    async fn add_comment(
        &self,
        post: &PostId,
        author: &UserId,
        content: CommentContent,
    ) -> Result<Post, Error>;

    /// Like or unlike a post on behalf of `user`.
    async fn toggle_like(&self, post: &PostId, user: &UserId) -> Result<Post, Error>;
}
