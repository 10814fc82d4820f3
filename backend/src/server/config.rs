//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use proflink::domain::ServiceCollaborators;
use proflink::inbound::http::session_config::SessionSettings;
use proflink::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) collaborators: ServiceCollaborators,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration without a database; the in-memory
    /// store backs every repository until [`Self::with_db_pool`] is called.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        collaborators: ServiceCollaborators,
    ) -> Self {
        Self {
            session,
            bind_addr,
            collaborators,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
