//! Event categories.
//!
//! Categories are a flat, name-unique catalogue that events use to group
//! teams by theme. The module mirrors the team layout: domain values,
//! a store port, memory and `PostgreSQL` adapters, and one service.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
