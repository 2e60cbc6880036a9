//! Category creation, lookup, revision, and removal.

use crate::category::{
    domain::{Category, CategoryDomainError, CategoryId, CategoryName},
    ports::{CategoryStore, CategoryStoreError},
};
use crate::context::{ContextError, RequestContext};
use crate::error::ErrorKind;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Request payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCategoryRequest {
    name: String,
    description: String,
}

impl CreateCategoryRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Request payload replacing a category's name and description.
pub type UpdateCategoryRequest = CreateCategoryRequest;

/// Errors returned by category service operations.
#[derive(Debug, Clone, Error)]
pub enum CategoryServiceError {
    /// Request validation failed.
    #[error(transparent)]
    Validation(#[from] CategoryDomainError),

    /// The category does not exist.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Another category already uses the name.
    #[error("category name '{0}' is already taken")]
    DuplicateCategoryName(CategoryName),

    /// The request context ended.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The store failed.
    #[error(transparent)]
    Store(CategoryStoreError),
}

impl CategoryServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::CategoryNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateCategoryName(_) => ErrorKind::Conflict,
            Self::Context(_) => ErrorKind::Cancelled,
            Self::Store(CategoryStoreError::DuplicateCategory(_)) => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<CategoryStoreError> for CategoryServiceError {
    fn from(err: CategoryStoreError) -> Self {
        match err {
            CategoryStoreError::NotFound(id) => Self::CategoryNotFound(id),
            CategoryStoreError::DuplicateName(name) => Self::DuplicateCategoryName(name),
            other => Self::Store(other),
        }
    }
}

/// Result type for category service operations.
pub type CategoryServiceResult<T> = Result<T, CategoryServiceError>;

fn log_failure(operation: &'static str, err: &CategoryServiceError) {
    match err.kind() {
        ErrorKind::Store => error!(operation, error = %err, "category operation failed"),
        kind => warn!(operation, ?kind, error = %err, "category operation rejected"),
    }
}

/// Category orchestration service.
#[derive(Clone)]
pub struct CategoryService<S, C>
where
    S: CategoryStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> CategoryService<S, C>
where
    S: CategoryStore,
    C: Clock + Send + Sync,
{
    /// Creates a new category service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a category with a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::Validation`] for invalid fields or
    /// [`CategoryServiceError::DuplicateCategoryName`] when the name is
    /// taken.
    #[instrument(skip(self, ctx, request), fields(user_id = %ctx.identity().user_id()))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateCategoryRequest,
    ) -> CategoryServiceResult<Category> {
        self.create_category(ctx, request)
            .await
            .inspect_err(|err| log_failure("category.create", err))
    }

    async fn create_category(
        &self,
        ctx: &RequestContext,
        request: CreateCategoryRequest,
    ) -> CategoryServiceResult<Category> {
        let name = CategoryName::new(request.name)?;
        self.ensure_name_available(ctx, &name, None).await?;

        let category = Category::new(name, request.description, &*self.clock)?;
        ctx.guard(self.store.create(&category)).await??;
        info!(category_id = %category.id(), name = %category.name(), "category created");
        Ok(category)
    }

    /// Lists every category ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::Store`] when the listing fails.
    #[instrument(skip(self, ctx))]
    pub async fn list(&self, ctx: &RequestContext) -> CategoryServiceResult<Vec<Category>> {
        ctx.guard(self.store.list())
            .await?
            .map_err(CategoryServiceError::from)
            .inspect_err(|err| log_failure("category.list", err))
    }

    /// Returns one category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::CategoryNotFound`] when it is missing.
    #[instrument(skip(self, ctx))]
    pub async fn find_by_id(
        &self,
        ctx: &RequestContext,
        category_id: CategoryId,
    ) -> CategoryServiceResult<Category> {
        self.find_or_error(ctx, category_id)
            .await
            .inspect_err(|err| log_failure("category.find_by_id", err))
    }

    /// Replaces a category's name and description.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::create`] plus
    /// [`CategoryServiceError::CategoryNotFound`].
    #[instrument(skip(self, ctx, request))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        category_id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> CategoryServiceResult<Category> {
        self.update_category(ctx, category_id, request)
            .await
            .inspect_err(|err| log_failure("category.update", err))
    }

    async fn update_category(
        &self,
        ctx: &RequestContext,
        category_id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> CategoryServiceResult<Category> {
        let name = CategoryName::new(request.name)?;
        let mut category = self.find_or_error(ctx, category_id).await?;
        self.ensure_name_available(ctx, &name, Some(category_id))
            .await?;

        category.revise(name, request.description, &*self.clock)?;
        ctx.guard(self.store.update(&category)).await??;
        info!(category_id = %category_id, "category updated");
        Ok(category)
    }

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryServiceError::CategoryNotFound`] when it is missing.
    #[instrument(skip(self, ctx))]
    pub async fn delete_by_id(
        &self,
        ctx: &RequestContext,
        category_id: CategoryId,
    ) -> CategoryServiceResult<()> {
        ctx.guard(self.store.delete(category_id))
            .await?
            .map_err(CategoryServiceError::from)
            .inspect_err(|err| log_failure("category.delete", err))?;
        info!(category_id = %category_id, "category deleted");
        Ok(())
    }

    async fn find_or_error(
        &self,
        ctx: &RequestContext,
        category_id: CategoryId,
    ) -> CategoryServiceResult<Category> {
        ctx.guard(self.store.find_by_id(category_id))
            .await??
            .ok_or(CategoryServiceError::CategoryNotFound(category_id))
    }

    async fn ensure_name_available(
        &self,
        ctx: &RequestContext,
        name: &CategoryName,
        owner: Option<CategoryId>,
    ) -> CategoryServiceResult<()> {
        let existing = ctx.guard(self.store.find_by_name(name)).await??;
        match existing {
            Some(category) if Some(category.id()) != owner => {
                Err(CategoryServiceError::DuplicateCategoryName(name.clone()))
            }
            _ => Ok(()),
        }
    }
}
