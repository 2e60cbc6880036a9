//! Diesel row models for team persistence.

use super::schema::{events, team_members, teams, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for events.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventRow {
    /// Event identifier.
    pub id: Uuid,
    /// Event title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for teams.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    /// Team identifier.
    pub id: Uuid,
    /// Owning event.
    pub event_id: Uuid,
    /// Creator.
    pub creator_id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Showcase link.
    pub showcase_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for teams.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    /// Team identifier.
    pub id: Uuid,
    /// Owning event.
    pub event_id: Uuid,
    /// Creator.
    pub creator_id: Uuid,
    /// Display name.
    pub name: String,
    /// Lower-cased name used for uniqueness.
    pub name_key: String,
    /// Free-form description.
    pub description: String,
    /// Showcase link.
    pub showcase_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for memberships.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamMemberRow {
    /// Membership identifier.
    pub id: Uuid,
    /// Team.
    pub team_id: Uuid,
    /// Event.
    pub event_id: Uuid,
    /// Inviter.
    pub inviter_id: Uuid,
    /// Invitee.
    pub invitee_id: Uuid,
    /// Status string.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for memberships.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = team_members)]
pub struct NewTeamMemberRow {
    /// Membership identifier.
    pub id: Uuid,
    /// Team.
    pub team_id: Uuid,
    /// Event.
    pub event_id: Uuid,
    /// Inviter.
    pub inviter_id: Uuid,
    /// Invitee.
    pub invitee_id: Uuid,
    /// Status string.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
