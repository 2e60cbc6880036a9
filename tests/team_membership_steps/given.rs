//! Given steps for team membership BDD scenarios.

use super::world::{MembershipWorld, run_async};
use eyre::WrapErr;
use function_junction::team::{
    domain::Event,
    services::{CreateTeamRequest, MembershipPolicy, TeamMemberService, TeamService},
};
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"an event "{title}" with a team size of {team_size:usize}"#)]
fn event_with_team_size(
    world: &mut MembershipWorld,
    title: String,
    team_size: usize,
) -> Result<(), eyre::Report> {
    let event = Event::new(title, &DefaultClock);
    world
        .store
        .insert_event(event.clone())
        .wrap_err("store scenario event")?;
    world.event = Some(event);
    world.members = Some(TeamMemberService::new(
        Arc::clone(&world.store),
        Arc::new(world.notifier.clone()),
        Arc::new(DefaultClock),
        MembershipPolicy::new(team_size, "https://junction.example/"),
    ));
    Ok(())
}

#[given(r#""{email}" is registered"#)]
fn user_is_registered(world: &mut MembershipWorld, email: String) -> Result<(), eyre::Report> {
    world.register(&email)
}

#[given(r#""{email}" leads the team "{name}""#)]
fn user_leads_team(
    world: &mut MembershipWorld,
    email: String,
    name: String,
) -> Result<(), eyre::Report> {
    world.register(&email)?;
    let ctx = world.context_for(&email)?;
    let event_id = world.event()?.id();
    let teams = TeamService::new(Arc::clone(&world.store), Arc::new(DefaultClock));
    let team = run_async(teams.create(&ctx, CreateTeamRequest::new(name), event_id))
        .wrap_err("create scenario team")?;
    world.team = Some(team);
    Ok(())
}

#[given(r#""{email}" has joined the team"#)]
fn user_has_joined(world: &mut MembershipWorld, email: String) -> Result<(), eyre::Report> {
    world.register(&email)?;
    let creator = world
        .team()?
        .created_by
        .as_ref()
        .map(|user| user.email.clone())
        .ok_or_else(|| eyre::eyre!("scenario team has no creator"))?;
    world.invite(&creator, &email)?;
    world.answer(&email, &email, "accept")?;
    match world.last_answer.take() {
        Some(Ok(_)) => Ok(()),
        other => Err(eyre::eyre!("joining the team failed: {other:?}")),
    }
}
