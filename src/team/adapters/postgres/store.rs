//! `PostgreSQL` team store backed by Diesel.

use super::{
    models::{
        EventRow, NewTeamMemberRow, NewTeamRow, TeamMemberRow, TeamRow, UserRow,
    },
    schema::{events, team_members, teams, users},
};
use crate::team::{
    domain::{
        EmailAddress, Event, EventId, MembershipStatus, PersistedTeamData,
        PersistedTeamMemberData, PersistedUserData, Team, TeamDetails, TeamId, TeamInfo,
        TeamMember, TeamMemberId, TeamName, User, UserId,
    },
    ports::{
        ListingFailure, TeamStore, TeamStoreError, TeamStoreResult, TransitionOutcome,
        TransitionRequest,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type for team adapters.
pub type TeamPgPool = Pool<ConnectionManager<PgConnection>>;

diesel::define_sql_function! {
    /// `PostgreSQL` `lower()`, matching the expression behind `idx_users_email`.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

const TEAM_NAME_CONSTRAINT: &str = "idx_teams_event_name";
const MEMBERSHIP_CONSTRAINT: &str = "idx_team_members_team_invitee";

/// `PostgreSQL`-backed team store.
#[derive(Debug, Clone)]
pub struct PostgresTeamStore {
    pool: TeamPgPool,
}

impl PostgresTeamStore {
    /// Creates a store from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: TeamPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> TeamStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TeamStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TeamStoreError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(TeamStoreError::persistence)?
    }
}

/// Stored addresses keep the case they were registered with.
fn email_lookup(address: String) -> users::BoxedQuery<'static, Pg> {
    users::table
        .filter(lower(users::email).eq(address))
        .into_boxed()
}

impl From<DieselError> for TeamStoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                Self::conflict(err)
            }
            _ => Self::persistence(err),
        }
    }
}

#[async_trait]
impl TeamStore for PostgresTeamStore {
    async fn find_user_by_id(&self, id: UserId) -> TeamStoreResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> TeamStoreResult<Option<User>> {
        let address = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = email_lookup(address)
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_event_by_id(&self, id: EventId) -> TeamStoreResult<Option<Event>> {
        self.run_blocking(move |connection| {
            let row = events::table
                .filter(events::id.eq(id.into_inner()))
                .select(EventRow::as_select())
                .first::<EventRow>(connection)
                .optional()?;
            Ok(row.map(row_to_event))
        })
        .await
    }

    async fn create_team(&self, team: &Team) -> TeamStoreResult<TeamInfo> {
        let team_row = to_new_team_row(team);
        let creator_row = to_new_member_row(&TeamMember::creator_of(team));
        let team_id = team.id();
        let event_id = team.event_id();
        let name = team.name().as_str().to_owned();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TeamStoreError, _>(|tx| {
                diesel::insert_into(teams::table)
                    .values(&team_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_constraint(info.as_ref(), TEAM_NAME_CONSTRAINT) =>
                        {
                            TeamStoreError::DuplicateTeamName {
                                event_id,
                                name: name.clone(),
                            }
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TeamStoreError::DuplicateTeam(team_id)
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            TeamStoreError::EventNotFound(event_id)
                        }
                        _ => TeamStoreError::from(err),
                    })?;
                diesel::insert_into(team_members::table)
                    .values(&creator_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await?;

        self.resolve_team_info(team.clone()).await
    }

    async fn scan_teams_by_event(
        &self,
        event_id: EventId,
    ) -> TeamStoreResult<(Vec<Team>, Vec<ListingFailure>)> {
        self.run_blocking(move |connection| {
            let rows = teams::table
                .filter(teams::event_id.eq(event_id.into_inner()))
                .order((teams::created_at.asc(), teams::id.asc()))
                .select(TeamRow::as_select())
                .load::<TeamRow>(connection)?;

            let mut decoded = Vec::with_capacity(rows.len());
            let mut failures = Vec::new();
            for row in rows {
                let record_id = row.id.to_string();
                match row_to_team(row) {
                    Ok(team) => decoded.push(team),
                    Err(error) => failures.push(ListingFailure { record_id, error }),
                }
            }
            Ok((decoded, failures))
        })
        .await
    }

    async fn find_team_by_id(&self, id: TeamId) -> TeamStoreResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .filter(teams::id.eq(id.into_inner()))
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()?;
            row.map(row_to_team).transpose()
        })
        .await
    }

    async fn find_team_by_event_id_and_name(
        &self,
        event_id: EventId,
        name: &TeamName,
    ) -> TeamStoreResult<Option<Team>> {
        let name_key = name.normalized();
        self.run_blocking(move |connection| {
            let row = teams::table
                .filter(teams::event_id.eq(event_id.into_inner()))
                .filter(teams::name_key.eq(&name_key))
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()?;
            row.map(row_to_team).transpose()
        })
        .await
    }

    async fn update_team(
        &self,
        id: TeamId,
        details: &TeamDetails,
        updated_at: DateTime<Utc>,
    ) -> TeamStoreResult<Team> {
        let name = details.name().as_str().to_owned();
        let name_key = details.name().normalized();
        let description = details.description().to_owned();
        let showcase_url = details.showcase_url().to_owned();

        self.run_blocking(move |connection| {
            let event_uuid = teams::table
                .filter(teams::id.eq(id.into_inner()))
                .select(teams::event_id)
                .first::<uuid::Uuid>(connection)
                .optional()?
                .ok_or(TeamStoreError::TeamNotFound(id))?;

            let row = diesel::update(teams::table.filter(teams::id.eq(id.into_inner())))
                .set((
                    teams::name.eq(&name),
                    teams::name_key.eq(&name_key),
                    teams::description.eq(&description),
                    teams::showcase_url.eq(&showcase_url),
                    teams::updated_at.eq(updated_at),
                ))
                .returning(TeamRow::as_returning())
                .get_result::<TeamRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), TEAM_NAME_CONSTRAINT) =>
                    {
                        TeamStoreError::DuplicateTeamName {
                            event_id: EventId::from_uuid(event_uuid),
                            name: name.clone(),
                        }
                    }
                    DieselError::NotFound => TeamStoreError::TeamNotFound(id),
                    _ => TeamStoreError::from(err),
                })?;
            row_to_team(row)
        })
        .await
    }

    async fn create_team_member(&self, member: &TeamMember) -> TeamStoreResult<()> {
        let row = to_new_member_row(member);
        let team_id = member.team_id();
        let invitee_id = member.invitee_id();

        self.run_blocking(move |connection| {
            diesel::insert_into(team_members::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), MEMBERSHIP_CONSTRAINT) =>
                    {
                        TeamStoreError::DuplicateMembership {
                            team_id,
                            invitee_id,
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TeamStoreError::TeamNotFound(team_id)
                    }
                    _ => TeamStoreError::from(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_team_member_by_id(
        &self,
        id: TeamMemberId,
    ) -> TeamStoreResult<Option<TeamMember>> {
        self.run_blocking(move |connection| {
            let row = team_members::table
                .filter(team_members::id.eq(id.into_inner()))
                .select(TeamMemberRow::as_select())
                .first::<TeamMemberRow>(connection)
                .optional()?;
            row.map(row_to_team_member).transpose()
        })
        .await
    }

    async fn find_team_member_by_invitee(
        &self,
        team_id: TeamId,
        invitee_id: UserId,
    ) -> TeamStoreResult<Option<TeamMember>> {
        self.run_blocking(move |connection| {
            let row = team_members::table
                .filter(team_members::team_id.eq(team_id.into_inner()))
                .filter(team_members::invitee_id.eq(invitee_id.into_inner()))
                .select(TeamMemberRow::as_select())
                .first::<TeamMemberRow>(connection)
                .optional()?;
            row.map(row_to_team_member).transpose()
        })
        .await
    }

    async fn find_team_members_by_invitee_and_event(
        &self,
        invitee_id: UserId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<TeamMember>> {
        self.run_blocking(move |connection| {
            let rows = team_members::table
                .filter(team_members::invitee_id.eq(invitee_id.into_inner()))
                .filter(team_members::event_id.eq(event_id.into_inner()))
                .order((team_members::created_at.asc(), team_members::id.asc()))
                .select(TeamMemberRow::as_select())
                .load::<TeamMemberRow>(connection)?;
            rows.into_iter().map(row_to_team_member).collect()
        })
        .await
    }

    async fn find_team_members(
        &self,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<TeamMember>> {
        self.run_blocking(move |connection| {
            let rows = team_members::table
                .filter(team_members::team_id.eq(team_id.into_inner()))
                .filter(team_members::event_id.eq(event_id.into_inner()))
                .order((team_members::created_at.asc(), team_members::id.asc()))
                .select(TeamMemberRow::as_select())
                .load::<TeamMemberRow>(connection)?;
            rows.into_iter().map(row_to_team_member).collect()
        })
        .await
    }

    async fn transition_team_member(
        &self,
        request: &TransitionRequest,
    ) -> TeamStoreResult<TransitionOutcome> {
        let request = *request;
        self.run_blocking(move |connection| {
            connection.transaction::<_, TeamStoreError, _>(|tx| apply_transition(tx, &request))
        })
        .await
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> TeamStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                team_members::table.filter(team_members::id.eq(id.into_inner())),
            )
            .execute(connection)?;
            if deleted == 0 {
                return Err(TeamStoreError::TeamMemberNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn count_accepted_members(
        &self,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamStoreResult<usize> {
        self.run_blocking(move |connection| count_accepted(connection, team_id, event_id))
            .await
    }
}

/// Performs the conditional status write inside an open transaction.
///
/// The membership row is locked first. Capacity-bounded writes then lock the
/// owning team row, which serializes concurrent accepts on the same team
/// while the accepted count is read and the update is written.
fn apply_transition(
    connection: &mut PgConnection,
    request: &TransitionRequest,
) -> TeamStoreResult<TransitionOutcome> {
    let row = team_members::table
        .filter(team_members::id.eq(request.member_id.into_inner()))
        .select(TeamMemberRow::as_select())
        .for_update()
        .first::<TeamMemberRow>(connection)
        .optional()?;
    let Some(stored_row) = row else {
        return Err(TeamStoreError::TeamMemberNotFound(request.member_id));
    };
    let mut member = row_to_team_member(stored_row)?;

    if member.status() != request.expected {
        return Ok(TransitionOutcome::StatusChanged {
            current: member.status(),
        });
    }

    if let Some(limit) = request.capacity {
        teams::table
            .filter(teams::id.eq(member.team_id().into_inner()))
            .select(teams::id)
            .for_update()
            .first::<uuid::Uuid>(connection)?;
        let accepted = count_accepted(connection, member.team_id(), member.event_id())?;
        if accepted >= limit {
            return Ok(TransitionOutcome::TeamComplete { accepted });
        }
    }

    member
        .transition_to(request.target, request.updated_at)
        .map_err(TeamStoreError::conflict)?;
    diesel::update(team_members::table.filter(team_members::id.eq(member.id().into_inner())))
        .set((
            team_members::status.eq(member.status().as_str()),
            team_members::updated_at.eq(member.updated_at()),
        ))
        .execute(connection)?;
    Ok(TransitionOutcome::Applied(member))
}

fn count_accepted(
    connection: &mut PgConnection,
    team_id: TeamId,
    event_id: EventId,
) -> TeamStoreResult<usize> {
    let count: i64 = team_members::table
        .filter(team_members::team_id.eq(team_id.into_inner()))
        .filter(team_members::event_id.eq(event_id.into_inner()))
        .filter(team_members::status.eq(MembershipStatus::Accepted.as_str()))
        .count()
        .get_result(connection)?;
    usize::try_from(count).map_err(TeamStoreError::invalid_persisted_data)
}

fn to_new_team_row(team: &Team) -> NewTeamRow {
    NewTeamRow {
        id: team.id().into_inner(),
        event_id: team.event_id().into_inner(),
        creator_id: team.creator_id().into_inner(),
        name: team.name().as_str().to_owned(),
        name_key: team.name().normalized(),
        description: team.description().to_owned(),
        showcase_url: team.showcase_url().to_owned(),
        created_at: team.created_at(),
        updated_at: team.updated_at(),
    }
}

fn to_new_member_row(member: &TeamMember) -> NewTeamMemberRow {
    NewTeamMemberRow {
        id: member.id().into_inner(),
        team_id: member.team_id().into_inner(),
        event_id: member.event_id().into_inner(),
        inviter_id: member.inviter_id().into_inner(),
        invitee_id: member.invitee_id().into_inner(),
        status: member.status().as_str().to_owned(),
        created_at: member.created_at(),
        updated_at: member.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> TeamStoreResult<User> {
    let email = EmailAddress::new(row.email).map_err(TeamStoreError::invalid_persisted_data)?;
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        email,
        first_name: row.first_name,
        last_name: row.last_name,
        created_at: row.created_at,
    }))
}

fn row_to_event(row: EventRow) -> Event {
    Event::from_persisted(EventId::from_uuid(row.id), row.title, row.created_at)
}

fn row_to_team(row: TeamRow) -> TeamStoreResult<Team> {
    let TeamRow {
        id,
        event_id,
        creator_id,
        name,
        description,
        showcase_url,
        created_at,
        updated_at,
    } = row;

    let parsed_name = TeamName::new(name).map_err(TeamStoreError::invalid_persisted_data)?;
    Ok(Team::from_persisted(PersistedTeamData {
        id: TeamId::from_uuid(id),
        event_id: EventId::from_uuid(event_id),
        creator_id: UserId::from_uuid(creator_id),
        name: parsed_name,
        description,
        showcase_url,
        created_at,
        updated_at,
    }))
}

fn row_to_team_member(row: TeamMemberRow) -> TeamStoreResult<TeamMember> {
    let TeamMemberRow {
        id,
        team_id,
        event_id,
        inviter_id,
        invitee_id,
        status,
        created_at,
        updated_at,
    } = row;

    let parsed_status = MembershipStatus::try_from(status.as_str())
        .map_err(TeamStoreError::invalid_persisted_data)?;
    Ok(TeamMember::from_persisted(PersistedTeamMemberData {
        id: TeamMemberId::from_uuid(id),
        team_id: TeamId::from_uuid(team_id),
        event_id: EventId::from_uuid(event_id),
        inviter_id: UserId::from_uuid(inviter_id),
        invitee_id: UserId::from_uuid(invitee_id),
        status: parsed_status,
        created_at,
        updated_at,
    }))
}

fn is_constraint(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}
