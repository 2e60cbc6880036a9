//! Capacity and uniqueness guarantees under concurrent requests.

use crate::in_memory::helpers::{Hackathon, context_for};
use function_junction::team::{
    domain::{MembershipStatus, TeamMemberInfo},
    ports::TeamStore,
    services::{
        CreateTeamMembersRequest, TeamServiceError, TeamServiceResult, UpdateTeamMemberRequest,
    },
};
use std::sync::Arc;

/// Two pending invitees race for the last seat: exactly one gets in.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_accepts_never_exceed_team_size() {
    let hack = Arc::new(Hackathon::seed(4).await);
    for email in ["amy@junction.example", "bo@junction.example"] {
        let user = hack.user(email);
        hack.invite(&hack.lead, &[email]).await;
        let invitation = hack.membership_of(&user).await;
        hack.members
            .update(
                &context_for(&user),
                UpdateTeamMemberRequest::new("accept"),
                invitation.id(),
                hack.team.team.id(),
                hack.event.id(),
            )
            .await
            .expect("accept should succeed while seats remain");
    }

    let racers = ["cat@junction.example", "dan@junction.example"].map(|email| hack.user(email));
    hack.invite(
        &hack.lead,
        &["cat@junction.example", "dan@junction.example"],
    )
    .await;

    let mut handles = Vec::new();
    for racer in racers {
        let invitation = hack.membership_of(&racer).await;
        let shared = Arc::clone(&hack);
        handles.push(tokio::spawn(async move {
            shared
                .members
                .update(
                    &context_for(&racer),
                    UpdateTeamMemberRequest::new("accept"),
                    invitation.id(),
                    shared.team.team.id(),
                    shared.event.id(),
                )
                .await
        }));
    }

    let mut results: Vec<TeamServiceResult<TeamMemberInfo>> = Vec::new();
    for handle in handles {
        results.push(handle.await.expect("task should not panic"));
    }

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let complete = results
        .iter()
        .filter(|result| matches!(result, Err(TeamServiceError::TeamComplete { limit: 4, .. })))
        .count();
    assert_eq!((successes, complete), (1, 1));

    let accepted = hack
        .store
        .count_accepted_members(hack.team.team.id(), hack.event.id())
        .await
        .expect("count should succeed");
    assert_eq!(accepted, 4);
}

/// The same address invited by two concurrent batches yields one record.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invites_create_one_membership() {
    let hack = Arc::new(Hackathon::seed(4).await);
    let eve = hack.user("eve@junction.example");

    let mut handles = Vec::new();
    for _ in 0..2 {
        let shared = Arc::clone(&hack);
        handles.push(tokio::spawn(async move {
            shared
                .members
                .create(
                    &context_for(&shared.lead),
                    CreateTeamMembersRequest::new(["eve@junction.example"]),
                    shared.team.team.id(),
                )
                .await
        }));
    }

    let mut failures = 0;
    for handle in handles {
        let response = handle
            .await
            .expect("task should not panic")
            .expect("batch should succeed");
        failures += response.failed_emails.len();
    }
    assert_eq!(failures, 1);

    let members = hack
        .store
        .find_team_members(hack.team.team.id(), hack.event.id())
        .await
        .expect("listing should succeed");
    let eve_records = members
        .iter()
        .filter(|member| member.invitee_id() == eve.id())
        .count();
    assert_eq!(eve_records, 1);
    assert_eq!(
        hack.membership_of(&eve).await.status(),
        MembershipStatus::Invited
    );
}
