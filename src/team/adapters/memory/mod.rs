//! In-memory adapters for team persistence.

mod store;

pub use store::InMemoryTeamStore;
