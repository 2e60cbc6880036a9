//! Then steps for team membership BDD scenarios.

use super::world::{MembershipWorld, run_async};
use eyre::WrapErr;
use function_junction::team::{domain::MembershipStatus, ports::TeamStore, services::TeamServiceError};
use rstest_bdd_macros::then;

#[then(r#"the invitation of "{email}" is "{status}""#)]
fn invitation_status_is(
    world: &MembershipWorld,
    email: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = MembershipStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let invitee_id = world.user(&email)?.id();
    let member = run_async(
        world
            .store
            .find_team_member_by_invitee(world.team()?.team.id(), invitee_id),
    )
    .wrap_err("look up scenario invitation")?
    .ok_or_else(|| eyre::eyre!("no invitation for {email}"))?;

    if member.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            member.status()
        ));
    }
    Ok(())
}

#[then(r#""{email}" received a notification"#)]
fn user_received_notification(world: &MembershipWorld, email: String) -> Result<(), eyre::Report> {
    let received = world
        .notifier
        .sent()
        .iter()
        .any(|notification| notification.to.contains(&email));
    if !received {
        return Err(eyre::eyre!("no notification was sent to {email}"));
    }
    Ok(())
}

#[then(r#"the failed emails are "{email}""#)]
fn failed_emails_are(world: &MembershipWorld, email: String) -> Result<(), eyre::Report> {
    if world.last_failed_emails != vec![email.clone()] {
        return Err(eyre::eyre!(
            "expected failed emails [{email}], got {:?}",
            world.last_failed_emails
        ));
    }
    Ok(())
}

#[then("the answer fails because the team is complete")]
fn answer_fails_team_complete(world: &MembershipWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_answer
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing answer result"))?;
    if !matches!(result, Err(TeamServiceError::TeamComplete { .. })) {
        return Err(eyre::eyre!("expected TeamComplete error, got {result:?}"));
    }
    Ok(())
}

#[then("the answer fails because the caller is not authorized")]
fn answer_fails_not_authorized(world: &MembershipWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_answer
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing answer result"))?;
    if !matches!(result, Err(TeamServiceError::NotAuthorizedToRespond { .. })) {
        return Err(eyre::eyre!(
            "expected NotAuthorizedToRespond error, got {result:?}"
        ));
    }
    Ok(())
}
