//! Builders for HTTP state and the collaborators handed to domain services.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultClock;
use tracing::{info, warn};

use proflink::domain::ports::{DisabledMediaStore, Mailer, MediaStore};
use proflink::domain::{AppLinks, ServiceCollaborators};
use proflink::inbound::http::state::{HttpState, HttpStatePorts};
use proflink::outbound::email::{HttpMailer, LoggingMailer};
use proflink::outbound::media::{CloudinaryCredentials, CloudinaryMediaStore};
use proflink::outbound::memory::InMemoryStore;
use proflink::outbound::password::BcryptPasswordHasher;
use proflink::outbound::persistence::{
    DieselNotificationRepository, DieselPostRepository, DieselUserRepository,
};
use proflink::settings::AppSettings;

use super::ServerConfig;

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

fn build_media_store(settings: &AppSettings) -> Result<Arc<dyn MediaStore>> {
    let Some(raw) = settings.cloudinary_url.as_deref() else {
        warn!("PROFLINK_CLOUDINARY_URL not set; image uploads are disabled");
        return Ok(Arc::new(DisabledMediaStore));
    };
    let credentials = CloudinaryCredentials::parse(raw).wrap_err("invalid Cloudinary URL")?;
    info!(cloud = credentials.cloud_name(), "image uploads enabled");
    let store = CloudinaryMediaStore::new(credentials, OUTBOUND_TIMEOUT)
        .wrap_err("failed to build Cloudinary client")?;
    Ok(Arc::new(store))
}

fn build_mailer(settings: &AppSettings) -> Result<Arc<dyn Mailer>> {
    let Some((endpoint, token, sender)) = settings.email_delivery()? else {
        warn!("email API not configured; emails will only be logged");
        return Ok(Arc::new(LoggingMailer));
    };
    info!(endpoint = %endpoint, sender = %sender.address, "email delivery enabled");
    let mailer = HttpMailer::new(endpoint, token, sender, OUTBOUND_TIMEOUT)
        .wrap_err("failed to build email client")?;
    Ok(Arc::new(mailer))
}

/// Build the non-store collaborators from application settings.
///
/// # Errors
///
/// Fails when a configured URL or credential is malformed.
pub fn build_collaborators(settings: &AppSettings) -> Result<ServiceCollaborators> {
    let links = AppLinks::new(settings.client_url()?)?;
    Ok(ServiceCollaborators {
        hasher: Arc::new(BcryptPasswordHasher::new(settings.bcrypt_cost())),
        media: build_media_store(settings)?,
        mailer: build_mailer(settings)?,
        links,
        clock: Arc::new(DefaultClock),
    })
}

/// Wire the domain services over Diesel repositories when a pool is
/// configured, otherwise over a process-local in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => HttpStatePorts::from_stores(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselPostRepository::new(pool.clone())),
            Arc::new(DieselNotificationRepository::new(pool.clone())),
            &config.collaborators,
        ),
        None => {
            let store = Arc::new(InMemoryStore::default());
            HttpStatePorts::from_stores(
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                &config.collaborators,
            )
        }
    };
    web::Data::new(HttpState::new(ports))
}
