//! Shared world state for team membership BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::WrapErr;
use function_junction::context::{RequestContext, RequestIdentity};
use function_junction::team::{
    adapters::{RecordingNotifier, memory::InMemoryTeamStore},
    domain::{EmailAddress, Event, TeamInfo, TeamMemberInfo, User},
    ports::TeamStore,
    services::{
        CreateTeamMembersRequest, TeamMemberService, TeamServiceResult, UpdateTeamMemberRequest,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Membership service type used by the BDD world.
pub type TestMemberService = TeamMemberService<InMemoryTeamStore, RecordingNotifier, DefaultClock>;

/// Scenario world for team membership behaviour tests.
pub struct MembershipWorld {
    pub store: Arc<InMemoryTeamStore>,
    pub notifier: RecordingNotifier,
    pub members: Option<TestMemberService>,
    pub event: Option<Event>,
    pub team: Option<TeamInfo>,
    pub users: HashMap<String, User>,
    pub last_failed_emails: Vec<String>,
    pub last_answer: Option<TeamServiceResult<TeamMemberInfo>>,
}

impl MembershipWorld {
    /// Creates a world with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryTeamStore::new()),
            notifier: RecordingNotifier::new(),
            members: None,
            event: None,
            team: None,
            users: HashMap::new(),
            last_failed_emails: Vec::new(),
            last_answer: None,
        }
    }

    /// Returns the registered user with `email`.
    pub fn user(&self, email: &str) -> Result<&User, eyre::Report> {
        self.users
            .get(email)
            .ok_or_else(|| eyre::eyre!("user {email} is not registered in scenario world"))
    }

    /// Returns the membership service.
    pub fn members(&self) -> Result<&TestMemberService, eyre::Report> {
        self.members
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing membership service in scenario world"))
    }

    /// Returns the scenario event.
    pub fn event(&self) -> Result<&Event, eyre::Report> {
        self.event
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing event in scenario world"))
    }

    /// Returns the scenario team.
    pub fn team(&self) -> Result<&TeamInfo, eyre::Report> {
        self.team
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing team in scenario world"))
    }

    /// Builds a request context acting as `email`.
    pub fn context_for(&self, email: &str) -> Result<RequestContext, eyre::Report> {
        let user = self.user(email)?;
        Ok(RequestContext::new(RequestIdentity::new(user.clone())))
    }

    /// Registers a user under `email`.
    pub fn register(&mut self, email: &str) -> Result<(), eyre::Report> {
        let address = EmailAddress::new(email).wrap_err("parse scenario email")?;
        let user = User::new(address, "Scenario", "User", &DefaultClock);
        self.store
            .insert_user(user.clone())
            .wrap_err("store scenario user")?;
        self.users.insert(email.to_owned(), user);
        Ok(())
    }

    /// Invites `email` to the scenario team on behalf of `inviter`.
    pub fn invite(&mut self, inviter: &str, email: &str) -> Result<(), eyre::Report> {
        let ctx = self.context_for(inviter)?;
        let team_id = self.team()?.team.id();
        let response = run_async(self.members()?.create(
            &ctx,
            CreateTeamMembersRequest::new([email]),
            team_id,
        ))
        .wrap_err("send scenario invitation")?;
        self.last_failed_emails = response.failed_emails;
        Ok(())
    }

    /// Answers the invitation of `invitee` as `responder`, keeping the result.
    pub fn answer(
        &mut self,
        responder: &str,
        invitee: &str,
        status: &str,
    ) -> Result<(), eyre::Report> {
        let ctx = self.context_for(responder)?;
        let invitee_id = self.user(invitee)?.id();
        let team_id = self.team()?.team.id();
        let event_id = self.event()?.id();

        let member = run_async(self.store.find_team_member_by_invitee(team_id, invitee_id))
            .wrap_err("look up scenario invitation")?
            .ok_or_else(|| eyre::eyre!("no invitation for {invitee}"))?;
        let result = run_async(self.members()?.update(
            &ctx,
            UpdateTeamMemberRequest::new(status),
            member.id(),
            team_id,
            event_id,
        ));
        self.last_answer = Some(result);
        Ok(())
    }
}

impl Default for MembershipWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MembershipWorld {
    MembershipWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
