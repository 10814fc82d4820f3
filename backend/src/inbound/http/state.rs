//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, NotificationRepository, PostRepository, PostsCommand, PostsQuery,
    ProfileCommand, ProfileQuery, UserRepository,
};
use crate::domain::{EngagementService, ProfileService, ServiceCollaborators, SessionIssuer};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Account port.
    pub accounts: Arc<dyn AccountService>,
    /// Post command port.
    pub posts: Arc<dyn PostsCommand>,
    /// Post query port.
    pub posts_query: Arc<dyn PostsQuery>,
    /// Profile query port.
    pub profile: Arc<dyn ProfileQuery>,
    /// Profile command port.
    pub profile_command: Arc<dyn ProfileCommand>,
}

impl HttpStatePorts {
    /// Wire the domain services over a set of store adapters.
    pub fn from_stores<U, P, N>(
        users: Arc<U>,
        posts: Arc<P>,
        notifications: Arc<N>,
        collaborators: &ServiceCollaborators,
    ) -> Self
    where
        U: UserRepository + 'static,
        P: PostRepository + 'static,
        N: NotificationRepository + 'static,
    {
        let ServiceCollaborators {
            hasher,
            media,
            mailer,
            links,
            clock,
        } = collaborators.clone();

        let accounts = SessionIssuer::new(Arc::clone(&users), hasher, Arc::clone(&clock))
            .with_mailer(Arc::clone(&mailer))
            .with_links(links.clone());
        let engagement = Arc::new(
            EngagementService::new(posts, Arc::clone(&users), notifications, clock)
                .with_media(media)
                .with_mailer(mailer)
                .with_links(links),
        );
        let profiles = Arc::new(ProfileService::new(users));

        Self {
            accounts: Arc::new(accounts),
            posts: engagement.clone(),
            posts_query: engagement,
            profile: profiles.clone(),
            profile_command: profiles,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Signup, login and session lookups.
    pub accounts: Arc<dyn AccountService>,
    /// Post mutations.
    pub posts: Arc<dyn PostsCommand>,
    /// Feed and post reads.
    pub posts_query: Arc<dyn PostsQuery>,
    /// Profile reads.
    pub profile: Arc<dyn ProfileQuery>,
    /// Profile edits.
    pub profile_command: Arc<dyn ProfileCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use proflink::domain::ServiceCollaborators;
    /// use proflink::domain::ports::{DisabledMediaStore, NoOpMailer};
    /// use proflink::inbound::http::state::{HttpState, HttpStatePorts};
    /// use proflink::outbound::memory::InMemoryStore;
    /// use proflink::outbound::password::BcryptPasswordHasher;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let collaborators = ServiceCollaborators {
    ///     hasher: Arc::new(BcryptPasswordHasher::default()),
    ///     media: Arc::new(DisabledMediaStore),
    ///     mailer: Arc::new(NoOpMailer),
    ///     links: Default::default(),
    ///     clock: Arc::new(DefaultClock),
    /// };
    /// let ports = HttpStatePorts::from_stores(store.clone(), store.clone(), store, &collaborators);
    /// let state = HttpState::new(ports);
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            posts,
            posts_query,
            profile,
            profile_command,
        } = ports;
        Self {
            accounts,
            posts,
            posts_query,
            profile,
            profile_command,
        }
    }
}
