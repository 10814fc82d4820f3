//! Transactional email adapters.
//!
//! [`HttpMailer`] posts JSON to a provider's send endpoint with a bearer
//! token. [`LoggingMailer`] only logs, for environments without a provider.

mod templates;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::domain::EmailAddress;
use crate::domain::ports::{CommentEmail, Mailer, MailerError, WelcomeEmail};

pub use templates::RenderedEmail;

/// Sender identity stamped on every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSender {
    /// From address.
    pub address: EmailAddress,
    /// From display name.
    pub name: String,
}

#[derive(Serialize)]
struct Party<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: Party<'a>,
    to: [Party<'a>; 1],
    subject: &'a str,
    html: &'a str,
    category: &'a str,
}

/// Mailer backed by an HTTP send API.
pub struct HttpMailer {
    client: Client,
    endpoint: Url,
    token: String,
    sender: EmailSender,
}

impl HttpMailer {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        token: impl Into<String>,
        sender: EmailSender,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            token: token.into(),
            sender,
        })
    }

    async fn deliver(&self, to: &EmailAddress, email: RenderedEmail) -> Result<(), MailerError> {
        let request = SendRequest {
            from: Party {
                email: self.sender.address.as_ref(),
                name: Some(&self.sender.name),
            },
            to: [Party {
                email: to.as_ref(),
                name: None,
            }],
            subject: &email.subject,
            html: &email.html,
            category: email.category,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|err| MailerError::delivery(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(160).collect();
            return Err(MailerError::delivery(format!(
                "status {}: {preview}",
                status.as_u16()
            )));
        }
        info!(category = email.category, "email dispatched");
        Ok(())
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError> {
        self.deliver(&email.to, templates::welcome(email)).await
    }

    async fn send_comment_notification(&self, email: &CommentEmail) -> Result<(), MailerError> {
        self.deliver(&email.to, templates::comment_notification(email))
            .await
    }
}

/// Mailer that logs each message instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send_welcome(&self, email: &WelcomeEmail) -> Result<(), MailerError> {
        let rendered = templates::welcome(email);
        info!(
            category = rendered.category,
            profile_url = %email.profile_url,
            "email delivery disabled; welcome email not sent"
        );
        Ok(())
    }

    async fn send_comment_notification(&self, email: &CommentEmail) -> Result<(), MailerError> {
        let rendered = templates::comment_notification(email);
        info!(
            category = rendered.category,
            post_url = %email.post_url,
            "email delivery disabled; comment email not sent"
        );
        Ok(())
    }
}
