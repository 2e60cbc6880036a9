//! Invitation workflow: bulk invites, responses, listings, and lookups.
//!
//! Accepting an invitation goes through the store's conditional transition,
//! so the capacity check and the status write happen as one atomic step.
//! When the record changed between read and write the whole
//! read-validate-write cycle runs once more before giving up.

use super::error::{TeamServiceError, TeamServiceResult, log_failure};
use super::notification;
use crate::context::RequestContext;
use crate::team::{
    domain::{
        EmailAddress, EventId, MembershipStatus, StatusUpdate, Team, TeamDomainError, TeamId,
        TeamMember, TeamMemberId, TeamMemberInfo, UserId, UserInfo,
    },
    ports::{
        Notification, Notifier, NotifierError, NotifierResult, TeamStore, TeamStoreError,
        TransitionOutcome, TransitionRequest,
    },
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);
const TRANSITION_ATTEMPTS: usize = 2;

/// Rules applied by [`TeamMemberService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipPolicy {
    team_size: usize,
    app_url: String,
    notify_timeout: Duration,
}

impl MembershipPolicy {
    /// Creates a policy with the given capacity and link base.
    #[must_use]
    pub fn new(team_size: usize, app_url: impl Into<String>) -> Self {
        Self {
            team_size,
            app_url: app_url.into(),
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    /// Sets the bound on a single notification dispatch.
    #[must_use]
    pub const fn with_notify_timeout(mut self, notify_timeout: Duration) -> Self {
        self.notify_timeout = notify_timeout;
        self
    }

    /// Returns the maximum number of accepted members per team.
    #[must_use]
    pub const fn team_size(&self) -> usize {
        self.team_size
    }

    /// Returns the base URL used in notification links.
    #[must_use]
    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// Returns the notification timeout.
    #[must_use]
    pub const fn notify_timeout(&self) -> Duration {
        self.notify_timeout
    }
}

/// Bulk invitation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamMembersRequest {
    emails: Vec<String>,
}

impl CreateTeamMembersRequest {
    /// Creates a request for the given addresses, in order.
    #[must_use]
    pub fn new(emails: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the requested addresses.
    #[must_use]
    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    fn validate(&self) -> Result<Vec<(String, EmailAddress)>, TeamDomainError> {
        if self.emails.is_empty() {
            return Err(TeamDomainError::EmptyEmailList);
        }
        self.emails
            .iter()
            .map(|raw| {
                let supplied = raw.trim().to_owned();
                EmailAddress::new(&supplied).map(|email| (supplied, email))
            })
            .collect()
    }
}

/// Outcome of a bulk invitation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateTeamMembersResponse {
    /// Addresses that were not invited, as supplied.
    pub failed_emails: Vec<String>,
}

/// Response to a pending invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTeamMemberRequest {
    status: String,
}

impl UpdateTeamMemberRequest {
    /// Creates a request carrying the raw status string.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }

    /// Returns the raw status string.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }
}

enum InviteOutcome {
    Invited(EmailAddress),
    Skipped(&'static str),
}

/// Team membership orchestration service.
#[derive(Clone)]
pub struct TeamMemberService<S, N, C>
where
    S: TeamStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
    policy: MembershipPolicy,
}

impl<S, N, C> TeamMemberService<S, N, C>
where
    S: TeamStore,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        clock: Arc<C>,
        policy: MembershipPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            policy,
        }
    }

    /// Returns the policy in force.
    #[must_use]
    pub const fn policy(&self) -> &MembershipPolicy {
        &self.policy
    }

    /// Invites every address in `request` to `team_id` on behalf of the
    /// caller.
    ///
    /// Each address is handled independently: unknown users, the caller's
    /// own address, existing memberships, and per-address store failures
    /// land in [`CreateTeamMembersResponse::failed_emails`] instead of
    /// failing the batch. One notification is sent to all invited users.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Validation`] for an empty list or a
    /// malformed address, [`TeamServiceError::TeamNotFound`] when the team is
    /// missing, and [`TeamServiceError::NotAuthorizedToInvite`] unless the
    /// caller is an accepted member of the team.
    #[instrument(
        skip(self, ctx, request),
        fields(user_id = %ctx.identity().user_id(), emails = request.emails().len())
    )]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateTeamMembersRequest,
        team_id: TeamId,
    ) -> TeamServiceResult<CreateTeamMembersResponse> {
        self.invite_all(ctx, &request, team_id)
            .await
            .inspect_err(|err| log_failure("team_member.create", err))
    }

    async fn invite_all(
        &self,
        ctx: &RequestContext,
        request: &CreateTeamMembersRequest,
        team_id: TeamId,
    ) -> TeamServiceResult<CreateTeamMembersResponse> {
        let targets = request.validate()?;
        let team = self.find_team_or_error(ctx, team_id).await?;
        self.ensure_can_invite(ctx, &team).await?;

        let mut invited = Vec::new();
        let mut response = CreateTeamMembersResponse::default();
        for (supplied, email) in targets {
            match self.invite_one(ctx, &team, &email).await {
                Ok(InviteOutcome::Invited(address)) => invited.push(address.as_str().to_owned()),
                Ok(InviteOutcome::Skipped(reason)) => {
                    debug!(email = %email, reason, "invitation skipped");
                    response.failed_emails.push(supplied);
                }
                Err(err @ TeamServiceError::Context(_)) => return Err(err),
                Err(err) => {
                    log_failure("team_member.invite", &err);
                    response.failed_emails.push(supplied);
                }
            }
        }

        info!(
            team_id = %team_id,
            invited = invited.len(),
            failed = response.failed_emails.len(),
            "invitation batch processed"
        );

        if !invited.is_empty() {
            let message = notification::invitation(
                ctx.identity().email(),
                invited,
                &team,
                self.policy.app_url(),
            );
            self.dispatch(message).await;
        }
        Ok(response)
    }

    async fn ensure_can_invite(&self, ctx: &RequestContext, team: &Team) -> TeamServiceResult<()> {
        let user_id = ctx.identity().user_id();
        let membership = ctx
            .guard(self.store.find_team_member_by_invitee(team.id(), user_id))
            .await??;
        let is_accepted = membership.is_some_and(|member| {
            member.status() == MembershipStatus::Accepted
                && member.belongs_to(team.id(), team.event_id())
        });
        if is_accepted {
            return Ok(());
        }
        Err(TeamServiceError::NotAuthorizedToInvite {
            team_id: team.id(),
            user_id,
        })
    }

    async fn invite_one(
        &self,
        ctx: &RequestContext,
        team: &Team,
        email: &EmailAddress,
    ) -> TeamServiceResult<InviteOutcome> {
        if email == ctx.identity().email() {
            return Ok(InviteOutcome::Skipped("cannot invite yourself"));
        }
        let Some(invitee) = ctx.guard(self.store.find_user_by_email(email)).await?? else {
            return Ok(InviteOutcome::Skipped("no registered user"));
        };
        let existing = ctx
            .guard(self.store.find_team_member_by_invitee(team.id(), invitee.id()))
            .await??;
        if existing.is_some() {
            return Ok(InviteOutcome::Skipped("already has a membership"));
        }

        let member = TeamMember::invite(
            team,
            ctx.identity().user_id(),
            invitee.id(),
            &*self.clock,
        );
        match ctx.guard(self.store.create_team_member(&member)).await? {
            Ok(()) => Ok(InviteOutcome::Invited(invitee.email().clone())),
            Err(TeamStoreError::DuplicateMembership { .. }) => {
                Ok(InviteOutcome::Skipped("already has a membership"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Accepts or rejects a pending invitation.
    ///
    /// Only the invitee may accept. The invitee or the inviter may reject.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Validation`] for an unsupported status,
    /// the not-found variants for missing or mismatched records (membership,
    /// then event, then team), [`TeamServiceError::NotAuthorizedToRespond`]
    /// for other callers, [`TeamServiceError::InvalidTransition`] when the
    /// invitation was already answered, [`TeamServiceError::TeamComplete`]
    /// when the team is full, and [`TeamServiceError::ConcurrentUpdate`]
    /// when the record kept changing.
    #[instrument(skip(self, ctx, request), fields(user_id = %ctx.identity().user_id()))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        request: UpdateTeamMemberRequest,
        team_member_id: TeamMemberId,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamServiceResult<TeamMemberInfo> {
        self.respond(ctx, &request, team_member_id, team_id, event_id)
            .await
            .inspect_err(|err| log_failure("team_member.update", err))
    }

    async fn respond(
        &self,
        ctx: &RequestContext,
        request: &UpdateTeamMemberRequest,
        team_member_id: TeamMemberId,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamServiceResult<TeamMemberInfo> {
        let update = StatusUpdate::parse(request.status())?;

        let member = self.find_member_or_error(ctx, team_member_id).await?;
        ctx.guard(self.store.find_event_by_id(event_id))
            .await??
            .ok_or(TeamServiceError::EventNotFound(event_id))?;
        let team = self.find_team_or_error(ctx, team_id).await?;
        if !member.belongs_to(team_id, event_id) {
            return Err(TeamServiceError::TeamMemberNotFound(team_member_id));
        }
        if team.event_id() != event_id {
            return Err(TeamServiceError::TeamNotFound(team_id));
        }

        let responder = ctx.identity().user_id();
        let is_invitee = member.invitee_id() == responder;
        let may_respond = match update {
            StatusUpdate::Accept => is_invitee,
            StatusUpdate::Reject => is_invitee || member.inviter_id() == responder,
        };
        if !may_respond {
            return Err(TeamServiceError::NotAuthorizedToRespond {
                team_member_id,
                user_id: responder,
            });
        }

        let updated = self
            .apply_transition(ctx, member, update.target_status())
            .await?;
        info!(
            team_member_id = %team_member_id,
            status = %updated.status(),
            "team member updated"
        );

        // Committed: cancellation no longer applies past this point.
        let resolved = self.resolve_committed(&updated).await;
        self.notify_counterparty(ctx, &resolved, &team, is_invitee)
            .await;
        Ok(resolved)
    }

    async fn resolve_committed(&self, updated: &TeamMember) -> TeamMemberInfo {
        match self.store.resolve_team_member_info(updated).await {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(
                    team_member_id = %updated.id(),
                    error = %err,
                    "could not resolve users for committed membership"
                );
                TeamMemberInfo::new(updated, None, None)
            }
        }
    }

    async fn apply_transition(
        &self,
        ctx: &RequestContext,
        mut member: TeamMember,
        target: MembershipStatus,
    ) -> TeamServiceResult<TeamMember> {
        let member_id = member.id();
        let capacity = (target == MembershipStatus::Accepted).then_some(self.policy.team_size);

        for attempt in 1..=TRANSITION_ATTEMPTS {
            member.ensure_can_transition(target)?;
            let request = TransitionRequest {
                member_id,
                expected: member.status(),
                target,
                capacity,
                updated_at: self.clock.utc(),
            };
            match ctx.guard(self.store.transition_team_member(&request)).await? {
                Ok(TransitionOutcome::Applied(updated)) => return Ok(updated),
                Ok(TransitionOutcome::TeamComplete { accepted }) => {
                    debug!(accepted, limit = self.policy.team_size, "team is complete");
                    return Err(TeamServiceError::TeamComplete {
                        team_id: member.team_id(),
                        limit: self.policy.team_size,
                    });
                }
                Ok(TransitionOutcome::StatusChanged { current }) => {
                    debug!(attempt, current = %current, "membership changed before write");
                }
                Err(TeamStoreError::Conflict(cause)) => {
                    debug!(attempt, error = %cause, "membership write conflicted");
                }
                Err(err) => return Err(err.into()),
            }
            if attempt < TRANSITION_ATTEMPTS {
                member = self.find_member_or_error(ctx, member_id).await?;
            }
        }
        Err(TeamServiceError::ConcurrentUpdate(member_id))
    }

    async fn notify_counterparty(
        &self,
        ctx: &RequestContext,
        resolved: &TeamMemberInfo,
        team: &Team,
        responder_is_invitee: bool,
    ) {
        let counterparty = if responder_is_invitee {
            resolved.inviter.as_ref()
        } else {
            resolved.invitee.as_ref()
        };
        let Some(recipient) = counterparty else {
            warn!(team_member_id = %resolved.id, "no recipient for status notification");
            return;
        };
        let message = EmailAddress::new(recipient.email.as_str())
            .map_err(|err| NotifierError::Render(err.to_string()))
            .and_then(|address| {
                notification::response(ctx.identity().email(), &address, resolved.status, team)
            });
        self.dispatch(message).await;
    }

    /// Lists the memberships of a team within an event.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NoTeamMembers`] when there are none.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamServiceResult<Vec<TeamMemberInfo>> {
        self.list_members(ctx, team_id, event_id)
            .await
            .inspect_err(|err| log_failure("team_member.list", err))
    }

    async fn list_members(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamServiceResult<Vec<TeamMemberInfo>> {
        let members = ctx
            .guard(self.store.list_team_members(team_id, event_id))
            .await??;
        if members.is_empty() {
            return Err(TeamServiceError::NoTeamMembers { team_id, event_id });
        }
        Ok(members)
    }

    /// Returns the users with a pending invitation to the caller in an event.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError`] when the store lookup fails.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.identity().user_id()))]
    pub async fn find_list_of_inviters(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
    ) -> TeamServiceResult<Vec<UserInfo>> {
        self.list_inviters(ctx, event_id)
            .await
            .inspect_err(|err| log_failure("team_member.find_list_of_inviters", err))
    }

    async fn list_inviters(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
    ) -> TeamServiceResult<Vec<UserInfo>> {
        let user_id: UserId = ctx.identity().user_id();
        Ok(ctx
            .guard(self.store.list_inviters(user_id, event_id))
            .await??)
    }

    /// Returns one membership with its users.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::TeamMemberNotFound`] when it is missing.
    #[instrument(skip(self, ctx))]
    pub async fn find_by_id(
        &self,
        ctx: &RequestContext,
        team_member_id: TeamMemberId,
    ) -> TeamServiceResult<TeamMemberInfo> {
        self.find_member_info(ctx, team_member_id)
            .await
            .inspect_err(|err| log_failure("team_member.find_by_id", err))
    }

    async fn find_member_info(
        &self,
        ctx: &RequestContext,
        team_member_id: TeamMemberId,
    ) -> TeamServiceResult<TeamMemberInfo> {
        let member = self.find_member_or_error(ctx, team_member_id).await?;
        Ok(ctx
            .guard(self.store.resolve_team_member_info(&member))
            .await??)
    }

    /// Deletes a membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::TeamMemberNotFound`] when it is missing.
    #[instrument(skip(self, ctx))]
    pub async fn delete_by_id(
        &self,
        ctx: &RequestContext,
        team_member_id: TeamMemberId,
    ) -> TeamServiceResult<()> {
        self.delete_member(ctx, team_member_id)
            .await
            .inspect_err(|err| log_failure("team_member.delete_by_id", err))
    }

    async fn delete_member(
        &self,
        ctx: &RequestContext,
        team_member_id: TeamMemberId,
    ) -> TeamServiceResult<()> {
        ctx.guard(self.store.delete_team_member(team_member_id))
            .await??;
        info!(team_member_id = %team_member_id, "team member deleted");
        Ok(())
    }

    async fn find_member_or_error(
        &self,
        ctx: &RequestContext,
        team_member_id: TeamMemberId,
    ) -> TeamServiceResult<TeamMember> {
        ctx.guard(self.store.find_team_member_by_id(team_member_id))
            .await??
            .ok_or(TeamServiceError::TeamMemberNotFound(team_member_id))
    }

    async fn find_team_or_error(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TeamServiceResult<Team> {
        ctx.guard(self.store.find_team_by_id(team_id))
            .await??
            .ok_or(TeamServiceError::TeamNotFound(team_id))
    }

    /// Sends a notification without letting its failure reach the caller.
    async fn dispatch(&self, message: NotifierResult<Notification>) {
        let timeout = self.policy.notify_timeout;
        let outcome = match message {
            Ok(notification) => {
                match tokio::time::timeout(timeout, self.notifier.send(&notification)).await {
                    Ok(sent) => sent.map(|()| notification.to.len()),
                    Err(_) => Err(NotifierError::TimedOut(timeout)),
                }
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(recipients) => debug!(recipients, "notification sent"),
            Err(err) => warn!(error = %err, "notification failed"),
        }
    }
}

