//! Membership state machine and request parsing tests.

use crate::team::domain::{
    EventId, MembershipStatus, StatusUpdate, Team, TeamDetails, TeamDomainError, TeamMember,
    UserId,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn team() -> Team {
    let details = TeamDetails::new("Borrow Checkers", "", "").expect("valid details");
    Team::new(EventId::new(), UserId::new(), details, &DefaultClock)
}

#[rstest]
#[case(MembershipStatus::Invited, MembershipStatus::Accepted, true)]
#[case(MembershipStatus::Invited, MembershipStatus::Rejected, true)]
#[case(MembershipStatus::Invited, MembershipStatus::Invited, false)]
#[case(MembershipStatus::Accepted, MembershipStatus::Rejected, false)]
#[case(MembershipStatus::Accepted, MembershipStatus::Invited, false)]
#[case(MembershipStatus::Rejected, MembershipStatus::Accepted, false)]
#[case(MembershipStatus::Rejected, MembershipStatus::Invited, false)]
fn transition_matrix(
    #[case] from: MembershipStatus,
    #[case] to: MembershipStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[rstest]
#[case("accept", StatusUpdate::Accept)]
#[case("Accepted", StatusUpdate::Accept)]
#[case(" REJECT ", StatusUpdate::Reject)]
#[case("rejected", StatusUpdate::Reject)]
fn status_updates_parse_case_insensitively(#[case] raw: &str, #[case] expected: StatusUpdate) {
    assert_eq!(StatusUpdate::parse(raw), Ok(expected));
}

#[rstest]
#[case("invited")]
#[case("maybe")]
#[case("")]
fn unsupported_status_updates_are_rejected(#[case] raw: &str) {
    assert_eq!(
        StatusUpdate::parse(raw),
        Err(TeamDomainError::InvalidStatusUpdate(raw.to_owned()))
    );
}

#[rstest]
fn creator_membership_starts_accepted(team: Team) {
    let member = TeamMember::creator_of(&team);

    assert_eq!(member.status(), MembershipStatus::Accepted);
    assert_eq!(member.inviter_id(), team.creator_id());
    assert_eq!(member.invitee_id(), team.creator_id());
    assert!(member.belongs_to(team.id(), team.event_id()));
}

#[rstest]
fn invitation_moves_once_then_stays_terminal(team: Team) {
    let mut member = TeamMember::invite(&team, team.creator_id(), UserId::new(), &DefaultClock);
    assert_eq!(member.status(), MembershipStatus::Invited);

    let answered_at = member.updated_at() + chrono::Duration::seconds(5);
    member
        .transition_to(MembershipStatus::Rejected, answered_at)
        .expect("invited -> rejected should be allowed");
    assert_eq!(member.updated_at(), answered_at);

    let error = member
        .transition_to(MembershipStatus::Accepted, answered_at)
        .expect_err("rejected is terminal");
    assert_eq!(error.from, "Rejected");
    assert_eq!(error.to, "Accepted");
}

#[rstest]
fn membership_is_scoped_to_its_event(team: Team) {
    let member = TeamMember::invite(&team, team.creator_id(), UserId::new(), &DefaultClock);
    assert!(!member.belongs_to(team.id(), EventId::new()));
}
