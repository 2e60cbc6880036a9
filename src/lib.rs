//! Function Junction: hackathon teams and membership invitations.
//!
//! This crate manages events, the teams formed within them, and the
//! invitation workflow through which team members recruit each other.
//!
//! # Architecture
//!
//! Function Junction follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, notifications)
//!
//! # Modules
//!
//! - [`team`]: Teams, memberships, and the invitation state machine
//! - [`category`]: Event categories
//! - [`context`]: Request identity, deadlines, and cancellation
//! - [`config`]: Environment-driven server configuration
//! - [`api`]: HTTP routes, authentication, and error mapping

pub mod api;
pub mod category;
pub mod config;
pub mod context;
pub mod error;
pub mod team;
