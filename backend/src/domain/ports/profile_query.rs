//! Driving port for public profile reads.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Driving port for profile reads and suggestions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// The public profile registered under `username`.
    async fn profile(&self, username: &str) -> Result<User, Error>;
}
