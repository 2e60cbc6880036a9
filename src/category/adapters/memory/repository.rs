//! Thread-safe in-memory category store.

use crate::category::{
    domain::{Category, CategoryId, CategoryName},
    ports::{CategoryStore, CategoryStoreError, CategoryStoreResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory category store keyed by identifier with a name index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryStore {
    state: Arc<RwLock<InMemoryCategoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryCategoryState {
    categories: HashMap<CategoryId, Category>,
    name_index: HashMap<String, CategoryId>,
}

impl InMemoryCategoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> CategoryStoreError {
    CategoryStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn create(&self, category: &Category) -> CategoryStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.categories.contains_key(&category.id()) {
            return Err(CategoryStoreError::DuplicateCategory(category.id()));
        }
        let key = category.name().normalized();
        if state.name_index.contains_key(&key) {
            return Err(CategoryStoreError::DuplicateName(category.name().clone()));
        }

        state.name_index.insert(key, category.id());
        state.categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn list(&self) -> CategoryStoreResult<Vec<Category>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut categories: Vec<_> = state.categories.values().cloned().collect();
        categories.sort_by_key(|category| category.name().normalized());
        Ok(categories)
    }

    async fn find_by_id(&self, id: CategoryId) -> CategoryStoreResult<Option<Category>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &CategoryName) -> CategoryStoreResult<Option<Category>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .name_index
            .get(&name.normalized())
            .and_then(|id| state.categories.get(id))
            .cloned())
    }

    async fn update(&self, category: &Category) -> CategoryStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        let stored_key = state
            .categories
            .get(&category.id())
            .ok_or(CategoryStoreError::NotFound(category.id()))?
            .name()
            .normalized();
        let new_key = category.name().normalized();

        if new_key != stored_key {
            if let Some(&indexed_id) = state.name_index.get(&new_key)
                && indexed_id != category.id()
            {
                return Err(CategoryStoreError::DuplicateName(category.name().clone()));
            }
            state.name_index.remove(&stored_key);
            state.name_index.insert(new_key, category.id());
        }

        state.categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn delete(&self, id: CategoryId) -> CategoryStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .categories
            .remove(&id)
            .ok_or(CategoryStoreError::NotFound(id))?;
        state.name_index.remove(&removed.name().normalized());
        Ok(())
    }
}
