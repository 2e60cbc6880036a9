//! Behaviour tests for the team membership invitation workflow.

#[path = "team_membership_steps/mod.rs"]
mod team_membership_steps_defs;

use rstest_bdd_macros::scenario;
use team_membership_steps_defs::world::{MembershipWorld, world};

#[scenario(
    path = "tests/features/team_membership.feature",
    name = "An invitee accepts an invitation"
)]
#[tokio::test(flavor = "multi_thread")]
async fn invitee_accepts_invitation(world: MembershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_membership.feature",
    name = "Unregistered addresses are reported as failed"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unregistered_addresses_fail(world: MembershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_membership.feature",
    name = "Acceptance is refused once the team is complete"
)]
#[tokio::test(flavor = "multi_thread")]
async fn acceptance_refused_when_complete(world: MembershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_membership.feature",
    name = "Only the invitee may accept"
)]
#[tokio::test(flavor = "multi_thread")]
async fn only_invitee_may_accept(world: MembershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/team_membership.feature",
    name = "The inviter withdraws an invitation"
)]
#[tokio::test(flavor = "multi_thread")]
async fn inviter_withdraws_invitation(world: MembershipWorld) {
    let _ = world;
}
