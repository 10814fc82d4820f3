//! Port for transactional email delivery.
//!
//! Emails are best-effort: services dispatch them on a background task and
//! only log failures.

use async_trait::async_trait;
use url::Url;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mailer adapters.
    pub enum MailerError {
        /// The provider refused or failed to accept the message.
        Delivery { message: String } => "email delivery failed: {message}",
    }
}

/// Greeting sent after signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEmail {
    /// Recipient address.
    pub to: EmailAddress,
    /// Name used in the greeting.
    pub name: String,
    /// Link to the new profile.
    pub profile_url: Url,
}

/// Alert sent to a post author when someone else comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEmail {
    /// Post author's address.
    pub to: EmailAddress,
    /// Post author's name.
    pub recipient_name: String,
    /// Who commented.
    pub commenter_name: String,
    /// Link to the post.
    pub post_url: Url,
    /// Comment text.
    pub comment: String,
}

/// Outbound port for transactional email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError>;

    async fn send_comment_notification(&self, email: &CommentEmail) -> Result<(), MailerError>;
}

/// Mailer that silently drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMailer;

#[async_trait]
impl Mailer for NoOpMailer {
    async fn send_welcome(&self, _email: &WelcomeEmail) -> Result<(), MailerError> {
        Ok(())
    }

    async fn send_comment_notification(&self, _email: &CommentEmail) -> Result<(), MailerError> {
        Ok(())
    }
}
