//! Category domain model.

mod category;
mod error;

pub use category::{Category, CategoryId, CategoryName, PersistedCategoryData};
pub use error::CategoryDomainError;
