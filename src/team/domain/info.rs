//! Read-only aggregate views composed at query time.

use super::{EventId, MembershipStatus, Team, TeamId, TeamMember, TeamMemberId, UserInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A membership joined with the users it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberInfo {
    /// Membership identifier.
    pub id: TeamMemberId,
    /// Team the membership belongs to.
    pub team_id: TeamId,
    /// Event the team belongs to.
    pub event_id: EventId,
    /// Current status.
    pub status: MembershipStatus,
    /// Invited user, when still resolvable.
    pub invitee: Option<UserInfo>,
    /// Inviting user, when still resolvable.
    pub inviter: Option<UserInfo>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TeamMemberInfo {
    /// Builds the view from a membership and its resolved users.
    #[must_use]
    pub fn new(member: &TeamMember, invitee: Option<UserInfo>, inviter: Option<UserInfo>) -> Self {
        Self {
            id: member.id(),
            team_id: member.team_id(),
            event_id: member.event_id(),
            status: member.status(),
            invitee,
            inviter,
            created_at: member.created_at(),
            updated_at: member.updated_at(),
        }
    }
}

/// A team joined with its creator and resolved member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    /// The team record.
    #[serde(flatten)]
    pub team: Team,
    /// Creator projection, when still resolvable.
    pub created_by: Option<UserInfo>,
    /// Every membership on the team, in creation order.
    pub members: Vec<TeamMemberInfo>,
}

impl TeamInfo {
    /// Returns the members whose status is `Accepted`.
    pub fn accepted_members(&self) -> impl Iterator<Item = &TeamMemberInfo> {
        self.members
            .iter()
            .filter(|member| member.status == MembershipStatus::Accepted)
    }
}
