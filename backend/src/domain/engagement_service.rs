//! Engagement service: posts, comments and likes.
//!
//! Ownership and existence checks happen here; atomicity of comment appends
//! and like toggles is delegated to the post repository. Image uploads are
//! synchronous and block post creation, whereas image deletion and comment
//! emails are best effort.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::notification_emitter::NotificationEmitter;
use crate::domain::port_errors::{map_post_error, map_user_error, post_not_found, user_not_found};
use crate::domain::ports::{
    CommentEmail, DisabledMediaStore, Mailer, MediaStore, NoOpMailer, NotificationRepository,
    PostRepository, PostsCommand, PostsQuery, UserRepository,
};
use crate::domain::side_effects::spawn_best_effort;
use crate::domain::{
    AppLinks, CommentContent, CommentId, Error, LikeToggle, NewComment, NewPost,
    NotificationKind, Post, PostDraft, PostId, User, UserId, Username,
};

const UPLOAD_FAILED: &str = "Failed to upload image. Please try with a smaller image.";

/// Implements [`PostsCommand`] and [`PostsQuery`] over the store ports.
pub struct EngagementService<P, U, N> {
    posts: Arc<P>,
    users: Arc<U>,
    notifications: NotificationEmitter<N>,
    media: Arc<dyn MediaStore>,
    mailer: Arc<dyn Mailer>,
    links: AppLinks,
    clock: Arc<dyn Clock>,
}

impl<P, U, N> EngagementService<P, U, N> {
    /// Create a service with uploads disabled and email switched off.
    pub fn new(posts: Arc<P>, users: Arc<U>, notifications: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            users,
            notifications: NotificationEmitter::new(notifications, Arc::clone(&clock)),
            media: Arc::new(DisabledMediaStore),
            mailer: Arc::new(NoOpMailer),
            links: AppLinks::default(),
            clock,
        }
    }

    /// Replace the image store used for post attachments.
    #[must_use]
    pub fn with_media(mut self, media: Arc<dyn MediaStore>) -> Self {
        self.media = media;
        self
    }

    /// Replace the mailer used for comment alerts.
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    /// Replace the links embedded in outgoing email.
    #[must_use]
    pub fn with_links(mut self, links: AppLinks) -> Self {
        self.links = links;
        self
    }
}

impl<P, U, N> EngagementService<P, U, N>
where
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn existing_post(&self, id: &PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(post_not_found)
    }

    async fn user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }

    async fn upload_image(&self, draft: &PostDraft) -> Result<Option<String>, Error> {
        let Some(image) = draft.image() else {
            return Ok(None);
        };
        match self.media.upload(image).await {
            Ok(stored) => {
                debug!(bytes = image.decoded_len(), "post image uploaded");
                Ok(Some(stored.url))
            }
            Err(error) => {
                warn!(%error, "post image upload failed");
                Err(Error::upload_failed(UPLOAD_FAILED))
            }
        }
    }

    async fn discard_image(&self, post: &Post) {
        let Some(url) = post.image_url.as_deref() else {
            return;
        };
        if let Err(error) = self.media.delete(url).await {
            warn!(post_id = %post.id, %error, "post image deletion failed");
        }
    }

    async fn email_comment(&self, post: &Post, commenter: &UserId, comment: &CommentContent) {
        let author = match self.user(&post.author.id).await {
            Ok(Some(author)) => author,
            Ok(None) => return,
            Err(error) => {
                warn!(post_id = %post.id, %error, "comment email skipped");
                return;
            }
        };
        let commenter_name = post
            .comments
            .iter()
            .rev()
            .find(|c| c.author.id == *commenter)
            .map(|c| c.author.name.clone())
            .unwrap_or_default();
        let email = CommentEmail {
            to: author.email,
            recipient_name: author.name.to_string(),
            commenter_name,
            post_url: self.links.post_url(&post.id),
            comment: comment.as_ref().to_owned(),
        };
        let mailer = Arc::clone(&self.mailer);
        spawn_best_effort("comment_email", async move {
            mailer.send_comment_notification(&email).await
        });
    }
}

#[async_trait]
impl<P, U, N> PostsCommand for EngagementService<P, U, N>
where
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn create_post(&self, author: &UserId, draft: PostDraft) -> Result<Post, Error> {
        let image_url = self.upload_image(&draft).await?;
        let post = NewPost {
            id: PostId::random(),
            author_id: *author,
            content: draft.content().to_owned(),
            image_url,
            created_at: self.clock.utc(),
        };
        self.posts.insert(&post).await.map_err(map_post_error)?;
        info!(post_id = %post.id, author = %author, "post created");
        self.existing_post(&post.id).await
    }

    async fn delete_post(&self, post: &PostId, requester: &UserId) -> Result<(), Error> {
        let existing = self.existing_post(post).await?;
        if !existing.is_authored_by(requester) {
            debug!(post_id = %post, requester = %requester, "delete refused: not the author");
            return Err(Error::forbidden("You are not authorized to delete this post"));
        }
        self.discard_image(&existing).await;
        if !self.posts.delete(post).await.map_err(map_post_error)? {
            return Err(post_not_found());
        }
        info!(post_id = %post, "post deleted");
        Ok(())
    }

    async fn add_comment(
        &self,
        post: &PostId,
        author: &UserId,
        content: CommentContent,
    ) -> Result<Post, Error> {
        let existing = self.existing_post(post).await?;
        let comment = NewComment {
            id: CommentId::random(),
            post_id: *post,
            author_id: *author,
            content: content.as_ref().to_owned(),
            created_at: self.clock.utc(),
        };
        self.posts
            .add_comment(&comment)
            .await
            .map_err(map_post_error)?;
        let updated = self.existing_post(post).await?;

        let recipient = existing.author.id;
        if self
            .notifications
            .emit(recipient, NotificationKind::Comment, *author, *post)
            .await?
            .is_some()
        {
            self.email_comment(&updated, author, &content).await;
        }
        Ok(updated)
    }

    async fn toggle_like(&self, post: &PostId, user: &UserId) -> Result<Post, Error> {
        let existing = self.existing_post(post).await?;
        let outcome = self
            .posts
            .toggle_like(post, user)
            .await
            .map_err(map_post_error)?;
        debug!(post_id = %post, user = %user, ?outcome, "like toggled");
        if outcome == LikeToggle::Liked {
            self.notifications
                .emit(existing.author.id, NotificationKind::Like, *user, *post)
                .await?;
        }
        self.existing_post(post).await
    }
}

#[async_trait]
impl<P, U, N> PostsQuery for EngagementService<P, U, N>
where
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn feed(&self, viewer: &UserId) -> Result<Vec<Post>, Error> {
        let viewer = self
            .user(viewer)
            .await?
            .ok_or_else(|| Error::unauthorized("Login required"))?;
        self.posts
            .list_by_authors(&viewer.feed_authors())
            .await
            .map_err(map_post_error)
    }

    async fn user_posts(&self, username: &str) -> Result<Vec<Post>, Error> {
        let username = Username::new(username).map_err(|_| user_not_found())?;
        let author = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)?;
        self.posts
            .list_by_authors(&[author.id])
            .await
            .map_err(map_post_error)
    }

    async fn post(&self, id: &PostId) -> Result<Post, Error> {
        self.existing_post(id).await
    }
}

#[cfg(test)]
#[path = "engagement_service_tests.rs"]
mod tests;
