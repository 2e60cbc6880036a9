//! Category persistence port.

use crate::category::domain::{Category, CategoryId, CategoryName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for category store operations.
pub type CategoryStoreResult<T> = Result<T, CategoryStoreError>;

/// Category persistence contract.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Stores a new category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryStoreError::DuplicateName`] when the name is taken.
    async fn create(&self, category: &Category) -> CategoryStoreResult<()>;

    /// Returns every category, ordered by name.
    async fn list(&self) -> CategoryStoreResult<Vec<Category>>;

    /// Finds a category by identifier.
    async fn find_by_id(&self, id: CategoryId) -> CategoryStoreResult<Option<Category>>;

    /// Finds a category by name (case-insensitive).
    async fn find_by_name(&self, name: &CategoryName) -> CategoryStoreResult<Option<Category>>;

    /// Persists changes to an existing category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryStoreError::NotFound`] when it does not exist or
    /// [`CategoryStoreError::DuplicateName`] when the new name is taken.
    async fn update(&self, category: &Category) -> CategoryStoreResult<()>;

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryStoreError::NotFound`] when it does not exist.
    async fn delete(&self, id: CategoryId) -> CategoryStoreResult<()>;
}

/// Errors returned by category store implementations.
#[derive(Debug, Clone, Error)]
pub enum CategoryStoreError {
    /// The category was not found.
    #[error("category not found: {0}")]
    NotFound(CategoryId),

    /// A category with the same identifier already exists.
    #[error("duplicate category identifier: {0}")]
    DuplicateCategory(CategoryId),

    /// A category with the same name already exists.
    #[error("duplicate category name: {0}")]
    DuplicateName(CategoryName),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CategoryStoreError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
