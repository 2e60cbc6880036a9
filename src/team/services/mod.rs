//! Orchestration services for teams and team memberships.

mod error;
mod membership;
pub mod notification;
mod team;

pub use crate::error::ErrorKind;
pub use error::{TeamServiceError, TeamServiceResult};
pub use membership::{
    CreateTeamMembersRequest, CreateTeamMembersResponse, MembershipPolicy, TeamMemberService,
    UpdateTeamMemberRequest,
};
pub use team::{CreateTeamRequest, TeamService, UpdateTeamRequest};
