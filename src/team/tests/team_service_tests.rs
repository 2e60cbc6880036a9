//! Team service tests against the in-memory store.

use super::{context_for, register_event, register_user};
use crate::team::{
    adapters::memory::InMemoryTeamStore,
    domain::{Event, EventId, MembershipStatus, TeamDomainError, TeamId, User},
    services::{CreateTeamRequest, ErrorKind, TeamService, TeamServiceError, UpdateTeamRequest},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

struct Setup {
    service: TeamService<InMemoryTeamStore, DefaultClock>,
    store: Arc<InMemoryTeamStore>,
    event: Event,
    lead: User,
}

#[fixture]
fn setup() -> Setup {
    let store = Arc::new(InMemoryTeamStore::new());
    let event = register_event(&store, "Autumn Hack");
    let lead = register_user(&store, "lead@x.com");
    Setup {
        service: TeamService::new(Arc::clone(&store), Arc::new(DefaultClock)),
        store,
        event,
        lead,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_team_has_exactly_its_creator_accepted(setup: Setup) {
    let info = setup
        .service
        .create(
            &context_for(&setup.lead),
            CreateTeamRequest::new("Ferris Wheelers"),
            setup.event.id(),
        )
        .await
        .expect("team creation should succeed");

    let accepted: Vec<_> = info.accepted_members().collect();
    assert_eq!(accepted.len(), 1);
    assert_eq!(
        accepted[0].invitee.as_ref().map(|user| user.id),
        Some(setup.lead.id())
    );
    assert_eq!(info.members.len(), 1);
    assert_eq!(info.created_by.map(|user| user.id), Some(setup.lead.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_team_round_trips_through_find(setup: Setup) {
    let ctx = context_for(&setup.lead);
    let created = setup
        .service
        .create(
            &ctx,
            CreateTeamRequest::new("Ferris Wheelers")
                .with_description("We build carousels")
                .with_showcase_url("https://example.com/ferris"),
            setup.event.id(),
        )
        .await
        .expect("team creation should succeed");

    let fetched = setup
        .service
        .find_by_id(&ctx, created.team.id())
        .await
        .expect("lookup should succeed");

    assert_eq!(fetched.team.name().as_str(), "Ferris Wheelers");
    assert_eq!(fetched.team.description(), "We build carousels");
    assert_eq!(fetched.team.showcase_url(), "https://example.com/ferris");
    assert_eq!(fetched, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn teams_require_an_existing_event(setup: Setup) {
    let missing = EventId::new();
    let result = setup
        .service
        .create(
            &context_for(&setup.lead),
            CreateTeamRequest::new("Nowhere"),
            missing,
        )
        .await;
    assert!(matches!(result, Err(TeamServiceError::EventNotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_names_are_unique_per_event_ignoring_case(setup: Setup) {
    let ctx = context_for(&setup.lead);
    setup
        .service
        .create(&ctx, CreateTeamRequest::new("Crabs"), setup.event.id())
        .await
        .expect("first team should be created");

    let result = setup
        .service
        .create(&ctx, CreateTeamRequest::new("  CRABS "), setup.event.id())
        .await;

    let error = result.expect_err("duplicate name should be rejected");
    assert!(matches!(error, TeamServiceError::DuplicateTeamName { .. }));
    assert_eq!(error.kind(), ErrorKind::Conflict);

    let other_event = register_event(&setup.store, "Winter Hack");
    setup
        .service
        .create(&ctx, CreateTeamRequest::new("Crabs"), other_event.id())
        .await
        .expect("same name in another event is allowed");
}

#[rstest]
#[case(CreateTeamRequest::new("   "), TeamDomainError::EmptyTeamName)]
#[case(
    CreateTeamRequest::new("Valid").with_showcase_url("ftp://example.com"),
    TeamDomainError::InvalidShowcaseUrl("ftp://example.com".to_owned())
)]
#[case(
    CreateTeamRequest::new("Valid").with_description("x".repeat(2001)),
    TeamDomainError::DescriptionTooLong
)]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_details_are_rejected(
    setup: Setup,
    #[case] request: CreateTeamRequest,
    #[case] expected: TeamDomainError,
) {
    let result = setup
        .service
        .create(&context_for(&setup.lead), request, setup.event.id())
        .await;
    assert!(matches!(result, Err(TeamServiceError::Validation(found)) if found == expected));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_creator_may_update(setup: Setup) {
    let created = setup
        .service
        .create(
            &context_for(&setup.lead),
            CreateTeamRequest::new("Crabs"),
            setup.event.id(),
        )
        .await
        .expect("team creation should succeed");
    let outsider = register_user(&setup.store, "mallory@x.com");

    let denied = setup
        .service
        .update(
            &context_for(&outsider),
            created.team.id(),
            UpdateTeamRequest::new("Hijacked", "", ""),
        )
        .await;
    assert!(matches!(
        denied,
        Err(TeamServiceError::NotTeamCreator { .. })
    ));

    let updated = setup
        .service
        .update(
            &context_for(&setup.lead),
            created.team.id(),
            UpdateTeamRequest::new("Crustaceans", "Renamed", "https://crabs.dev"),
        )
        .await
        .expect("creator update should succeed");

    assert_eq!(updated.team.name().as_str(), "Crustaceans");
    assert_eq!(updated.team.description(), "Renamed");
    assert_eq!(updated.team.created_at(), created.team.created_at());
    assert!(updated.team.updated_at() >= created.team.updated_at());
    assert_eq!(updated.members.len(), 1);
    assert_eq!(updated.members[0].status, MembershipStatus::Accepted);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_a_missing_team_is_not_found(setup: Setup) {
    let missing = TeamId::new();
    let result = setup
        .service
        .update(
            &context_for(&setup.lead),
            missing,
            UpdateTeamRequest::new("Ghost", "", ""),
        )
        .await;
    assert!(matches!(result, Err(TeamServiceError::TeamNotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_scoped_to_the_event(setup: Setup) {
    let ctx = context_for(&setup.lead);
    let other_event = register_event(&setup.store, "Other Hack");
    for name in ["Alpha", "Beta"] {
        setup
            .service
            .create(&ctx, CreateTeamRequest::new(name), setup.event.id())
            .await
            .expect("team creation should succeed");
    }
    setup
        .service
        .create(&ctx, CreateTeamRequest::new("Gamma"), other_event.id())
        .await
        .expect("team creation should succeed");

    let teams = setup
        .service
        .list(&ctx, setup.event.id())
        .await
        .expect("listing should succeed");

    let names: Vec<_> = teams.iter().map(|info| info.team.name().as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}
