//! Shared state handed to every handler.

use crate::category::{
    adapters::{memory::InMemoryCategoryStore, postgres::PostgresCategoryStore},
    ports::CategoryStore,
    services::CategoryService,
};
use crate::config::AppConfig;
use crate::context::{RequestContext, RequestIdentity};
use crate::team::{
    adapters::{
        RecordingNotifier, TracingNotifier, memory::InMemoryTeamStore,
        postgres::PostgresTeamStore,
    },
    ports::{Notifier, TeamStore},
    services::{TeamMemberService, TeamService},
};
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;

/// Ties together the adapter types one deployment runs on.
pub trait Backend: Send + Sync + 'static {
    /// Team and membership persistence.
    type Teams: TeamStore + 'static;
    /// Category persistence.
    type Categories: CategoryStore + 'static;
    /// Outbound notification gateway.
    type Notifier: Notifier + 'static;
}

/// `PostgreSQL` stores with log-only notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresBackend;

impl Backend for PostgresBackend {
    type Teams = PostgresTeamStore;
    type Categories = PostgresCategoryStore;
    type Notifier = TracingNotifier;
}

/// In-memory stores with a recording notifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryBackend;

impl Backend for InMemoryBackend {
    type Teams = InMemoryTeamStore;
    type Categories = InMemoryCategoryStore;
    type Notifier = RecordingNotifier;
}

/// Services and settings shared across requests.
pub struct AppState<B: Backend> {
    teams: TeamService<B::Teams, DefaultClock>,
    members: TeamMemberService<B::Teams, B::Notifier, DefaultClock>,
    categories: CategoryService<B::Categories, DefaultClock>,
    users: Arc<B::Teams>,
    jwt_secret: String,
    request_timeout: Duration,
}

impl<B: Backend> AppState<B> {
    /// Wires the services over the given adapters.
    #[must_use]
    pub fn new(
        store: Arc<B::Teams>,
        categories: Arc<B::Categories>,
        notifier: Arc<B::Notifier>,
        config: &AppConfig,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        Self {
            teams: TeamService::new(Arc::clone(&store), Arc::clone(&clock)),
            members: TeamMemberService::new(
                Arc::clone(&store),
                notifier,
                Arc::clone(&clock),
                config.membership_policy(),
            ),
            categories: CategoryService::new(categories, clock),
            users: store,
            jwt_secret: config.jwt_secret.clone(),
            request_timeout: config.request_timeout,
        }
    }

    /// Returns the team service.
    #[must_use]
    pub const fn teams(&self) -> &TeamService<B::Teams, DefaultClock> {
        &self.teams
    }

    /// Returns the membership service.
    #[must_use]
    pub const fn members(&self) -> &TeamMemberService<B::Teams, B::Notifier, DefaultClock> {
        &self.members
    }

    /// Returns the category service.
    #[must_use]
    pub const fn categories(&self) -> &CategoryService<B::Categories, DefaultClock> {
        &self.categories
    }

    /// Returns the store used to resolve authenticated users.
    #[must_use]
    pub fn users(&self) -> &B::Teams {
        &self.users
    }

    /// Returns the bearer token secret.
    #[must_use]
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Starts a request context for `identity` with the configured deadline.
    #[must_use]
    pub fn context(&self, identity: RequestIdentity) -> RequestContext {
        RequestContext::new(identity).with_timeout(self.request_timeout)
    }
}
