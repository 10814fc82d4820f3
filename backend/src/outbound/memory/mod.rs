//! In-memory implementation of every store port.
//!
//! Used by the test harness and by debug builds started without a database
//! URL. State lives behind a single mutex so compound updates (toggle a like,
//! append a comment) are atomic with respect to each other.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    NotificationPersistenceError, NotificationRepository, PostPersistenceError, PostRepository,
    StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, EmailAddress, LikeToggle, NewComment, NewPost, Notification,
    PasswordHash, Post, PostId, ProfileUpdate, User, UserId, UserSummary, Username,
};

struct UserRecord {
    user: User,
    password_hash: PasswordHash,
}

struct CommentRecord {
    id: CommentId,
    author_id: UserId,
    content: String,
    created_at: DateTime<Utc>,
}

struct PostRecord {
    sequence: u64,
    post: NewPost,
    updated_at: DateTime<Utc>,
    comments: Vec<CommentRecord>,
    likes: Vec<UserId>,
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserRecord>,
    posts: HashMap<PostId, PostRecord>,
    notifications: Vec<(u64, Notification)>,
    next_sequence: u64,
}

impl State {
    fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    fn summary(&self, id: &UserId) -> UserSummary {
        self.users.get(id).map_or_else(
            || UserSummary {
                id: *id,
                name: String::new(),
                username: String::new(),
                profile_picture: None,
                headline: String::new(),
            },
            |record| record.user.summary(),
        )
    }

    fn populate(&self, record: &PostRecord) -> Post {
        Post {
            id: record.post.id,
            author: self.summary(&record.post.author_id),
            content: record.post.content.clone(),
            image_url: record.post.image_url.clone(),
            comments: record
                .comments
                .iter()
                .map(|comment| Comment {
                    id: comment.id,
                    author: self.summary(&comment.author_id),
                    content: comment.content.clone(),
                    created_at: comment.created_at,
                })
                .collect(),
            likes: record.likes.clone(),
            created_at: record.post.created_at,
            updated_at: record.updated_at,
        }
    }

    fn find_user(&self, matches: impl Fn(&User) -> bool) -> Option<&UserRecord> {
        self.users.values().find(|record| matches(&record.user))
    }
}

/// Process-local store implementing the user, post and notification ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a mutual connection between two existing users.
    ///
    /// Unknown identifiers are ignored; connecting twice is a no-op.
    pub fn connect(&self, first: &UserId, second: &UserId) {
        let mut state = self.state();
        for (owner, peer) in [(first, second), (second, first)] {
            if let Some(record) = state.users.get_mut(owner) {
                if !record.user.connections.contains(peer) {
                    record.user.connections.push(*peer);
                }
            }
        }
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.state().users.len()
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.state().posts.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if state.find_user(|u| u.email == user.email).is_some() {
            return Err(UserPersistenceError::duplicate("email"));
        }
        if state.find_user(|u| u.username == user.username).is_some() {
            return Err(UserPersistenceError::duplicate("username"));
        }
        state.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state().users.get(id).map(|record| record.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .find_user(|u| &u.username == username)
            .map(|record| record.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .find_user(|u| &u.email == email)
            .map(|record| record.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .state()
            .find_user(|u| &u.username == username)
            .map(|record| StoredCredentials {
                user: record.user.clone(),
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.state();
        Ok(state.users.get_mut(id).map(|record| {
            update.apply_to(&mut record.user);
            record.user.clone()
        }))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: &NewPost) -> Result<(), PostPersistenceError> {
        let mut state = self.state();
        let sequence = state.next_sequence();
        state.posts.insert(
            post.id,
            PostRecord {
                sequence,
                post: post.clone(),
                updated_at: post.created_at,
                comments: Vec::new(),
                likes: Vec::new(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let state = self.state();
        Ok(state.posts.get(id).map(|record| state.populate(record)))
    }

    async fn list_by_authors(&self, authors: &[UserId]) -> Result<Vec<Post>, PostPersistenceError> {
        let state = self.state();
        let mut records: Vec<&PostRecord> = state
            .posts
            .values()
            .filter(|record| authors.contains(&record.post.author_id))
            .collect();
        records.sort_by(|a, b| {
            b.post
                .created_at
                .cmp(&a.post.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(records
            .into_iter()
            .map(|record| state.populate(record))
            .collect())
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        let mut state = self.state();
        let removed = state.posts.remove(id).is_some();
        if removed {
            state
                .notifications
                .retain(|(_, notification)| notification.post != Some(*id));
        }
        Ok(removed)
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<(), PostPersistenceError> {
        let mut state = self.state();
        let record = state
            .posts
            .get_mut(&comment.post_id)
            .ok_or_else(|| PostPersistenceError::post_not_found(comment.post_id.to_string()))?;
        record.comments.push(CommentRecord {
            id: comment.id,
            author_id: comment.author_id,
            content: comment.content.clone(),
            created_at: comment.created_at,
        });
        record.updated_at = comment.created_at;
        Ok(())
    }

    async fn toggle_like(
        &self,
        post: &PostId,
        user: &UserId,
    ) -> Result<LikeToggle, PostPersistenceError> {
        let mut state = self.state();
        let record = state
            .posts
            .get_mut(post)
            .ok_or_else(|| PostPersistenceError::post_not_found(post.to_string()))?;
        if let Some(index) = record.likes.iter().position(|liker| liker == user) {
            record.likes.remove(index);
            Ok(LikeToggle::Unliked)
        } else {
            record.likes.push(*user);
            Ok(LikeToggle::Liked)
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationPersistenceError> {
        let mut state = self.state();
        let sequence = state.next_sequence();
        state.notifications.push((sequence, notification.clone()));
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let state = self.state();
        let mut matching: Vec<&(u64, Notification)> = state
            .notifications
            .iter()
            .filter(|(_, notification)| &notification.recipient == recipient)
            .collect();
        matching.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        Ok(matching
            .into_iter()
            .map(|(_, notification)| notification.clone())
            .collect())
    }
}
