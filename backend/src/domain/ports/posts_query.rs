//! Driving port for post reads.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostId, UserId};

/// Driving port for feed and post reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Posts by the viewer and their connections, newest first.
    async fn feed(&self, viewer: &UserId) -> Result<Vec<Post>, Error>;

    /// Posts written by the user registered under `username`, newest first.
    async fn user_posts(&self, username: &str) -> Result<Vec<Post>, Error>;

    /// A single populated post.
    async fn post(&self, id: &PostId) -> Result<Post, Error>;
}
