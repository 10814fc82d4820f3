//! Driving port for editing one's own profile.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, User, UserId};

/// Driving port for profile edits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply `update` to the user's profile and return the result.
    async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<User, Error>;
}
