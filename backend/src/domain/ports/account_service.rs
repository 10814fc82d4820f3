//! Driving port for signup, login and session resolution.
//!
//! Inbound adapters call it with shape-checked input and turn the returned
//! [`Authenticated`] value into a session cookie. The port never sees the
//! cookie itself.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, SessionClaims, User};

/// A user together with freshly issued session claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    /// The authenticated user.
    pub user: User,
    /// Claims to store in the session cookie.
    pub session: SessionClaims,
}

/// Driving port for signup, login and session lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and sign the new user in.
    async fn register(&self, registration: Registration) -> Result<Authenticated, Error>;

    /// Verify credentials and sign the user in.
    async fn login(&self, credentials: LoginCredentials) -> Result<Authenticated, Error>;

    /// Resolve unexpired session claims to the live user record.
    async fn current_user(&self, session: &SessionClaims) -> Result<User, Error>;
}
