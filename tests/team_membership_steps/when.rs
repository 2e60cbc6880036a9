//! When steps for team membership BDD scenarios.

use super::world::MembershipWorld;
use rstest_bdd_macros::when;

#[when(r#""{inviter}" invites "{email}""#)]
fn invite(world: &mut MembershipWorld, inviter: String, email: String) -> Result<(), eyre::Report> {
    world.invite(&inviter, &email)
}

#[when(r#""{responder}" answers the invitation of "{invitee}" with "{status}""#)]
fn answer_invitation(
    world: &mut MembershipWorld,
    responder: String,
    invitee: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.answer(&responder, &invitee, &status)
}
