//! Adapter implementations for category persistence.

pub mod memory;
pub mod postgres;
