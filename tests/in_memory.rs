//! In-memory integration tests for the team membership workflow.
//!
//! Tests are organized into modules by functionality:
//! - `invitation_flow_tests`: Invite, accept, reject, and listing round trips
//! - `concurrency_tests`: Capacity and uniqueness under concurrent requests

mod in_memory {
    pub mod helpers;

    mod concurrency_tests;
    mod invitation_flow_tests;
}
