//! Port contracts for team persistence and outbound notifications.

mod notifier;
mod store;

pub use notifier::{Notification, Notifier, NotifierError, NotifierResult};
pub use store::{
    ListingFailure, TeamListing, TeamStore, TeamStoreError, TeamStoreResult, TransitionOutcome,
    TransitionRequest,
};
