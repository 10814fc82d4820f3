//! Session issuer: signup, login and session resolution.
//!
//! Passwords are hashed and verified on the blocking pool. A welcome email is
//! sent after signup on a background task; its failure never fails signup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::port_errors::{duplicate_user_field, map_hash_error, map_user_error};
use crate::domain::ports::{
    AccountService, Authenticated, Mailer, NoOpMailer, PasswordHasher, UserRepository, WelcomeEmail,
};
use crate::domain::side_effects::spawn_best_effort;
use crate::domain::{
    AppLinks, Error, LoginCredentials, PasswordHash, Profile, Registration,
    RegistrationValidationError, SessionClaims, User, UserId, Username,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account service backed by a user repository and a password hasher.
pub struct SessionIssuer<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn Mailer>,
    links: AppLinks,
    clock: Arc<dyn Clock>,
}

impl<U> SessionIssuer<U> {
    /// Create a service that sends no email and links to the local client.
    pub fn new(users: Arc<U>, hasher: Arc<dyn PasswordHasher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            mailer: Arc::new(NoOpMailer),
            links: AppLinks::default(),
            clock,
        }
    }

    /// Deliver welcome emails through `mailer`.
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    /// Build profile links against `links`.
    #[must_use]
    pub fn with_links(mut self, links: AppLinks) -> Self {
        self.links = links;
        self
    }
}

impl<U> SessionIssuer<U>
where
    U: UserRepository,
{
    async fn ensure_unclaimed(&self, registration: &Registration) -> Result<(), Error> {
        if self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(duplicate_user_field("email"));
        }
        if self
            .users
            .find_by_username(registration.username())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(duplicate_user_field("username"));
        }
        Ok(())
    }

    async fn hash_password(&self, password: Zeroizing<String>) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(
        &self,
        password: Zeroizing<String>,
        hash: PasswordHash,
    ) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hash_error)
    }

    fn send_welcome(&self, user: &User) {
        let email = WelcomeEmail {
            to: user.email.clone(),
            name: user.name.to_string(),
            profile_url: self.links.profile_url(&user.username),
        };
        let mailer = Arc::clone(&self.mailer);
        spawn_best_effort("welcome_email", async move { mailer.send_welcome(&email).await });
    }
}

fn weak_password(error: &RegistrationValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "password",
        "code": "too_short",
    }))
}

#[async_trait]
impl<U> AccountService for SessionIssuer<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<Authenticated, Error> {
        self.ensure_unclaimed(&registration).await?;
        registration
            .ensure_password_strength()
            .map_err(|err| weak_password(&err))?;

        let password_hash = self
            .hash_password(Zeroizing::new(registration.password().to_owned()))
            .await?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            name: registration.name().clone(),
            username: registration.username().clone(),
            email: registration.email().clone(),
            profile: Profile::default(),
            connections: Vec::new(),
            created_at: now,
        };
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        self.send_welcome(&user);

        let session = SessionClaims::issue(user.id, now);
        Ok(Authenticated { user, session })
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<Authenticated, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            debug!("login rejected: malformed username");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };
        let Some(stored) = self
            .users
            .find_credentials(&username)
            .await
            .map_err(map_user_error)?
        else {
            debug!(username = %username, "login rejected: unknown username");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        if !self.verify_password(password, stored.password_hash).await? {
            debug!(username = %username, "login rejected: password mismatch");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        let user = stored.user;
        info!(user_id = %user.id, "user logged in");
        let session = SessionClaims::issue(user.id, self.clock.utc());
        Ok(Authenticated { user, session })
    }

    async fn current_user(&self, session: &SessionClaims) -> Result<User, Error> {
        if session.is_expired(self.clock.utc()) {
            debug!(user_id = %session.user_id(), "session expired");
            return Err(Error::unauthorized("Session expired"));
        }
        self.users
            .find_by_id(session.user_id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("Login required"))
    }
}

#[cfg(test)]
#[path = "session_issuer_tests.rs"]
mod tests;
