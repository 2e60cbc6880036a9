//! Step definitions for team membership scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
