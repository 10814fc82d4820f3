//! Backend entry-point: loads configuration, prepares storage and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, bail, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use proflink::inbound::http::health::HealthState;
use proflink::inbound::http::session_config::{BuildMode, session_settings_from_env};
use proflink::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use proflink::settings::AppSettings;
use server::{ServerConfig, build_collaborators, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&DefaultEnv::new(), mode)?;
    let bind_addr = settings.bind_addr()?;
    let collaborators = build_collaborators(&settings)?;

    let mut config = ServerConfig::new(session, bind_addr, collaborators);
    match settings.database_url.as_deref() {
        Some(url) => {
            if settings.run_migrations() {
                run_pending_migrations(url).await?;
            }
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            config = config.with_db_pool(pool);
        }
        None if mode == BuildMode::Debug => {
            warn!("PROFLINK_DATABASE_URL not set; using the in-memory store");
        }
        None => bail!("PROFLINK_DATABASE_URL is required in release builds"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await?;
    Ok(())
}
