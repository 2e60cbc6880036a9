//! In-memory category store.

mod repository;

pub use repository::InMemoryCategoryStore;
