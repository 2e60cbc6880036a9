//! `PostgreSQL` adapters for team persistence.

mod models;
mod schema;
mod store;

pub use store::{PostgresTeamStore, TeamPgPool};
