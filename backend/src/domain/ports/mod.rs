//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, media, mail, hashing) are implemented by
//! outbound adapters; driving ports (account, posts, profiles) are what the
//! inbound HTTP adapter calls.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod mailer;
mod media_store;
mod notification_repository;
mod password_hasher;
mod post_repository;
mod posts_command;
mod posts_query;
mod profile_command;
mod profile_query;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, Authenticated};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{CommentEmail, Mailer, MailerError, NoOpMailer, WelcomeEmail};
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{DisabledMediaStore, MediaStore, MediaStoreError, StoredImage};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationPersistenceError, NotificationRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::PostsCommand;
#[cfg(test)]
pub use posts_query::MockPostsQuery;
pub use posts_query::PostsQuery;
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
