//! Diesel schema for team persistence.

diesel::table! {
    /// Registered users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Email address as registered; unique on `lower(email)`.
        #[max_length = 255]
        email -> Varchar,
        /// Given name.
        #[max_length = 100]
        first_name -> Varchar,
        /// Family name.
        #[max_length = 100]
        last_name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hackathon events.
    events (id) {
        /// Event identifier.
        id -> Uuid,
        /// Event title.
        #[max_length = 255]
        title -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Teams formed within an event.
    teams (id) {
        /// Team identifier.
        id -> Uuid,
        /// Owning event.
        event_id -> Uuid,
        /// User who created the team.
        creator_id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Lower-cased name, unique per event.
        #[max_length = 100]
        name_key -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Project showcase link, empty when unset.
        showcase_url -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership and invitation records.
    team_members (id) {
        /// Membership identifier.
        id -> Uuid,
        /// Team the membership belongs to.
        team_id -> Uuid,
        /// Event the team belongs to.
        event_id -> Uuid,
        /// User who sent the invitation.
        inviter_id -> Uuid,
        /// User who was invited.
        invitee_id -> Uuid,
        /// Membership status (`Invited`, `Accepted`, `Rejected`).
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(teams -> events (event_id));
diesel::joinable!(team_members -> teams (team_id));

diesel::allow_tables_to_appear_in_same_query!(users, events, teams, team_members);
