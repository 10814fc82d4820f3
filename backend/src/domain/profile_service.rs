//! Profile reads and self-service edits.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::port_errors::{map_user_error, user_not_found};
use crate::domain::ports::{ProfileCommand, ProfileQuery, UserRepository};
use crate::domain::{Error, ProfileUpdate, User, UserId, Username};

/// Implements [`ProfileQuery`] and [`ProfileCommand`] over a user repository.
pub struct ProfileService<U> {
    users: Arc<U>,
}

impl<U> ProfileService<U> {
    /// Serve profiles from `users`.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> ProfileQuery for ProfileService<U>
where
    U: UserRepository,
{
    async fn profile(&self, username: &str) -> Result<User, Error> {
        let username = Username::new(username).map_err(|_| user_not_found())?;
        self.users
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)
    }
}

#[async_trait]
impl<U> ProfileCommand for ProfileService<U>
where
    U: UserRepository,
{
    async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<User, Error> {
        let updated = self
            .users
            .update_profile(user, &update)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)?;
        info!(user_id = %user, "profile updated");
        Ok(updated)
    }
}
