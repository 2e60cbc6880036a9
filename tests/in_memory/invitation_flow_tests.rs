//! End-to-end invitation flows through the services.

use crate::in_memory::helpers::{APP_URL, Hackathon, context_for};
use function_junction::team::{
    domain::MembershipStatus,
    services::{TeamServiceError, UpdateTeamMemberRequest},
};

/// Invite, accept, and list: the accepted invitee shows up as a member and the
/// lead is told about the acceptance.
#[tokio::test(flavor = "multi_thread")]
async fn invited_user_accepts_and_joins() {
    let hack = Hackathon::seed(4).await;
    let ana = hack.user("ana@junction.example");

    let failed = hack
        .invite(&hack.lead, &["ana@junction.example", "ghost@junction.example"])
        .await;
    assert_eq!(failed, vec!["ghost@junction.example".to_owned()]);

    let invitation = hack.membership_of(&ana).await;
    let accepted = hack
        .members
        .update(
            &context_for(&ana),
            UpdateTeamMemberRequest::new("Accepted"),
            invitation.id(),
            hack.team.team.id(),
            hack.event.id(),
        )
        .await
        .expect("accept should succeed");
    assert_eq!(accepted.status, MembershipStatus::Accepted);

    let listed = hack
        .members
        .list(&context_for(&ana), hack.team.team.id(), hack.event.id())
        .await
        .expect("listing should succeed");
    let accepted_ids: Vec<_> = listed
        .iter()
        .filter(|member| member.status == MembershipStatus::Accepted)
        .filter_map(|member| member.invitee.as_ref().map(|user| user.id))
        .collect();
    assert_eq!(accepted_ids, vec![hack.lead.id(), ana.id()]);

    let sent = hack.notifier.sent();
    assert_eq!(sent.len(), 2);
    let invitation_mail = sent.first().expect("invitation notification");
    assert_eq!(invitation_mail.to, vec!["ana@junction.example".to_owned()]);
    assert!(
        invitation_mail
            .body
            .contains(&format!("{APP_URL}events/{}", hack.event.id()))
    );
    let response_mail = sent.get(1).expect("response notification");
    assert_eq!(response_mail.to, vec![hack.lead.email().as_str().to_owned()]);
    assert_eq!(response_mail.from, "ana@junction.example");
}

/// A pending invitee sees the lead among their inviters until they answer.
#[tokio::test(flavor = "multi_thread")]
async fn inviters_list_tracks_pending_invitations() {
    let hack = Hackathon::seed(4).await;
    let ben = hack.user("ben@junction.example");
    hack.invite(&hack.lead, &["ben@junction.example"]).await;

    let before = hack
        .members
        .find_list_of_inviters(&context_for(&ben), hack.event.id())
        .await
        .expect("inviters should load");
    assert_eq!(
        before.iter().map(|user| user.id).collect::<Vec<_>>(),
        vec![hack.lead.id()]
    );

    let invitation = hack.membership_of(&ben).await;
    hack.members
        .update(
            &context_for(&ben),
            UpdateTeamMemberRequest::new("reject"),
            invitation.id(),
            hack.team.team.id(),
            hack.event.id(),
        )
        .await
        .expect("reject should succeed");

    let after = hack
        .members
        .find_list_of_inviters(&context_for(&ben), hack.event.id())
        .await
        .expect("inviters should load");
    assert!(after.is_empty());
}

/// A rejected invitation cannot be reopened by accepting it afterwards.
#[tokio::test(flavor = "multi_thread")]
async fn rejected_invitation_stays_rejected() {
    let hack = Hackathon::seed(4).await;
    let cy = hack.user("cy@junction.example");
    hack.invite(&hack.lead, &["cy@junction.example"]).await;
    let invitation = hack.membership_of(&cy).await;

    hack.members
        .update(
            &context_for(&hack.lead),
            UpdateTeamMemberRequest::new("rejected"),
            invitation.id(),
            hack.team.team.id(),
            hack.event.id(),
        )
        .await
        .expect("the inviter may withdraw");

    let result = hack
        .members
        .update(
            &context_for(&cy),
            UpdateTeamMemberRequest::new("accept"),
            invitation.id(),
            hack.team.team.id(),
            hack.event.id(),
        )
        .await;

    assert!(matches!(result, Err(TeamServiceError::InvalidTransition(_))));
    assert_eq!(
        hack.membership_of(&cy).await.status(),
        MembershipStatus::Rejected
    );
}

/// Deleting a membership lets the team invite the same user again.
#[tokio::test(flavor = "multi_thread")]
async fn deleted_membership_can_be_reissued() {
    let hack = Hackathon::seed(4).await;
    let dee = hack.user("dee@junction.example");
    hack.invite(&hack.lead, &["dee@junction.example"]).await;
    let invitation = hack.membership_of(&dee).await;

    hack.members
        .delete_by_id(&context_for(&hack.lead), invitation.id())
        .await
        .expect("delete should succeed");
    let failed = hack.invite(&hack.lead, &["dee@junction.example"]).await;

    assert!(failed.is_empty());
    assert_ne!(hack.membership_of(&dee).await.id(), invitation.id());
}
