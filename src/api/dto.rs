//! Request and response bodies.

use crate::category::services::CreateCategoryRequest;
use crate::team::{
    domain::{TeamMemberInfo, UserInfo},
    services::{
        CreateTeamMembersRequest, CreateTeamRequest, UpdateTeamMemberRequest, UpdateTeamRequest,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body for creating or updating a team.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct TeamBody {
    /// Team name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    /// Showcase link, empty when absent.
    #[serde(default)]
    pub showcase_url: String,
}

impl TeamBody {
    pub(super) fn into_create(self) -> CreateTeamRequest {
        CreateTeamRequest::new(self.name)
            .with_description(self.description)
            .with_showcase_url(self.showcase_url)
    }

    pub(super) fn into_update(self) -> UpdateTeamRequest {
        UpdateTeamRequest::new(self.name, self.description, self.showcase_url)
    }
}

/// Body for inviting users by email.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct InviteBody {
    /// Addresses to invite.
    #[validate(length(min = 1))]
    pub emails: Vec<String>,
}

impl From<InviteBody> for CreateTeamMembersRequest {
    fn from(body: InviteBody) -> Self {
        Self::new(body.emails)
    }
}

/// Body for answering an invitation.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RespondBody {
    /// `accept`/`accepted` or `reject`/`rejected`.
    #[validate(length(min = 1))]
    pub status: String,
}

impl From<RespondBody> for UpdateTeamMemberRequest {
    fn from(body: RespondBody) -> Self {
        Self::new(body.status)
    }
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CategoryBody {
    /// Category name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

impl From<CategoryBody> for CreateCategoryRequest {
    fn from(body: CategoryBody) -> Self {
        Self::new(body.name, body.description)
    }
}

/// Membership listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembersResponse {
    /// Memberships in creation order.
    pub team_members: Vec<TeamMemberInfo>,
}

/// A single membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberResponse {
    /// The membership.
    pub team_member: TeamMemberInfo,
}

/// Users with a pending invitation to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitersResponse {
    /// Distinct inviters.
    pub inviters_info: Vec<UserInfo>,
}
