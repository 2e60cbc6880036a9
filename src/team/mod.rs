//! Teams and the membership invitation workflow.
//!
//! A team belongs to one event and is created by a user who becomes its
//! first accepted member. Accepted members invite other registered users by
//! email; invitees accept or reject, and acceptance is refused once the team
//! holds its configured number of accepted members. The module follows the
//! hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
