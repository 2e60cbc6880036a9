//! Port contracts for category persistence.

mod repository;

pub use repository::{CategoryStore, CategoryStoreError, CategoryStoreResult};
