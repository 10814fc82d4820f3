//! Driven collaborators shared by the domain services.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::AppLinks;
use crate::domain::ports::{Mailer, MediaStore, PasswordHasher};

/// Non-store dependencies handed to every service at wiring time.
#[derive(Clone)]
pub struct ServiceCollaborators {
    /// Password hashing.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Image hosting.
    pub media: Arc<dyn MediaStore>,
    /// Transactional email.
    pub mailer: Arc<dyn Mailer>,
    /// Deep links for email bodies.
    pub links: AppLinks,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}
