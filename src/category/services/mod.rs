//! Orchestration services for categories.

mod service;

pub use service::{
    CategoryService, CategoryServiceError, CategoryServiceResult, CreateCategoryRequest,
    UpdateCategoryRequest,
};
