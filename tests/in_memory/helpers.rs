//! Shared test helpers for in-memory integration tests.

use function_junction::context::{RequestContext, RequestIdentity};
use function_junction::team::{
    adapters::{RecordingNotifier, memory::InMemoryTeamStore},
    domain::{EmailAddress, Event, TeamInfo, TeamMember, User},
    ports::TeamStore,
    services::{
        CreateTeamMembersRequest, CreateTeamRequest, MembershipPolicy, TeamMemberService,
        TeamService,
    },
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Membership service type used by the integration tests.
pub type Members = TeamMemberService<InMemoryTeamStore, RecordingNotifier, DefaultClock>;

/// Base URL used for notification links.
pub const APP_URL: &str = "https://junction.example/";

/// A seeded event with one team led by `lead`.
pub struct Hackathon {
    pub store: Arc<InMemoryTeamStore>,
    pub notifier: RecordingNotifier,
    pub members: Arc<Members>,
    pub event: Event,
    pub lead: User,
    pub team: TeamInfo,
}

impl Hackathon {
    /// Seeds an event, a lead, and the lead's team with the given capacity.
    pub async fn seed(team_size: usize) -> Self {
        let store = Arc::new(InMemoryTeamStore::new());
        let notifier = RecordingNotifier::new();
        let event = Event::new("Autumn Hack", &DefaultClock);
        store
            .insert_event(event.clone())
            .expect("event should be stored");
        let lead = register(&store, "lead@junction.example");

        let teams = TeamService::new(Arc::clone(&store), Arc::new(DefaultClock));
        let team = teams
            .create(
                &context_for(&lead),
                CreateTeamRequest::new("Borrow Checkers"),
                event.id(),
            )
            .await
            .expect("team should be created");

        let members = Arc::new(TeamMemberService::new(
            Arc::clone(&store),
            Arc::new(notifier.clone()),
            Arc::new(DefaultClock),
            MembershipPolicy::new(team_size, APP_URL),
        ));

        Self {
            store,
            notifier,
            members,
            event,
            lead,
            team,
        }
    }

    /// Registers a user.
    pub fn user(&self, email: &str) -> User {
        register(&self.store, email)
    }

    /// Invites `emails` on behalf of `inviter`, returning the failed ones.
    pub async fn invite(&self, inviter: &User, emails: &[&str]) -> Vec<String> {
        self.members
            .create(
                &context_for(inviter),
                CreateTeamMembersRequest::new(emails.iter().copied()),
                self.team.team.id(),
            )
            .await
            .expect("invitation batch should succeed")
            .failed_emails
    }

    /// Returns the membership of `user` on the seeded team.
    pub async fn membership_of(&self, user: &User) -> TeamMember {
        self.store
            .find_team_member_by_invitee(self.team.team.id(), user.id())
            .await
            .expect("lookup should succeed")
            .expect("membership should exist")
    }
}

/// Registers a user with the given email.
pub fn register(store: &InMemoryTeamStore, email: &str) -> User {
    let address = EmailAddress::new(email).expect("valid email");
    let user = User::new(address, "Test", "Hacker", &DefaultClock);
    store.insert_user(user.clone()).expect("user should be stored");
    user
}

/// Builds a request context for `user`.
pub fn context_for(user: &User) -> RequestContext {
    RequestContext::new(RequestIdentity::new(user.clone()))
}
