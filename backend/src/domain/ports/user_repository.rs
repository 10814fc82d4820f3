//! Port abstraction for the credential store and its errors.
//!
//! Adapters own username/email uniqueness: an insert that collides must fail
//! with [`UserPersistenceError::Duplicate`] naming the clashing field, even
//! when a concurrent signup slipped past the service's pre-checks.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, ProfileUpdate, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique attribute (`username` or `email`) is already claimed.
        Duplicate { field: String } => "user {field} already exists",
    }
}

/// User record paired with its password hash, for credential checks only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the hash belongs to.
    pub user: User,
    /// Stored bcrypt hash.
    pub password_hash: PasswordHash,
}

/// Persistence port for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with their password hash.
    async fn insert(&self, user: &User, password_hash: &PasswordHash)
    -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by their unique username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by their unique email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the user and password hash registered under `username`.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Apply a profile edit, returning the updated user or `None` when the
    /// user does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;
}
