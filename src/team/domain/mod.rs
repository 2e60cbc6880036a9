//! Domain model for teams and team membership.
//!
//! The team domain models users, events, teams, and the invitation records
//! that link users to teams, together with the invitation state machine.
//! Persistence and delivery concerns stay outside this boundary.

mod error;
mod event;
mod ids;
mod info;
mod member;
mod team;
mod user;

pub use error::{MembershipTransitionError, ParseMembershipStatusError, TeamDomainError};
pub use event::Event;
pub use ids::{EventId, TeamId, TeamMemberId, UserId};
pub use info::{TeamInfo, TeamMemberInfo};
pub use member::{MembershipStatus, PersistedTeamMemberData, StatusUpdate, TeamMember};
pub use team::{PersistedTeamData, Team, TeamDetails, TeamName};
pub use user::{EmailAddress, PersistedUserData, User, UserInfo};
