//! `PostgreSQL` adapters for category persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresCategoryStore;
