//! `PostgreSQL` category store.

use super::{
    models::{CategoryRow, NewCategoryRow},
    schema::categories,
};
use crate::category::{
    domain::{Category, CategoryId, CategoryName, PersistedCategoryData},
    ports::{CategoryStore, CategoryStoreError, CategoryStoreResult},
};
use crate::team::adapters::postgres::TeamPgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed category store sharing the team connection pool.
#[derive(Debug, Clone)]
pub struct PostgresCategoryStore {
    pool: TeamPgPool,
}

impl PostgresCategoryStore {
    /// Creates a store from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: TeamPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> CategoryStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CategoryStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CategoryStoreError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(CategoryStoreError::persistence)?
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn create(&self, category: &Category) -> CategoryStoreResult<()> {
        let row = NewCategoryRow {
            id: category.id().into_inner(),
            name: category.name().as_str().to_owned(),
            name_key: category.name().normalized(),
            description: category.description().to_owned(),
            created_at: category.created_at(),
            updated_at: category.updated_at(),
        };
        let id = category.id();
        let name = category.name().clone();

        self.run_blocking(move |connection| {
            diesel::insert_into(categories::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, id, &name))?;
            Ok(())
        })
        .await
    }

    async fn list(&self) -> CategoryStoreResult<Vec<Category>> {
        self.run_blocking(move |connection| {
            let rows = categories::table
                .order(categories::name_key.asc())
                .select(CategoryRow::as_select())
                .load::<CategoryRow>(connection)
                .map_err(CategoryStoreError::persistence)?;
            rows.into_iter().map(row_to_category).collect()
        })
        .await
    }

    async fn find_by_id(&self, id: CategoryId) -> CategoryStoreResult<Option<Category>> {
        self.run_blocking(move |connection| {
            let row = categories::table
                .filter(categories::id.eq(id.into_inner()))
                .select(CategoryRow::as_select())
                .first::<CategoryRow>(connection)
                .optional()
                .map_err(CategoryStoreError::persistence)?;
            row.map(row_to_category).transpose()
        })
        .await
    }

    async fn find_by_name(&self, name: &CategoryName) -> CategoryStoreResult<Option<Category>> {
        let key = name.normalized();
        self.run_blocking(move |connection| {
            let row = categories::table
                .filter(categories::name_key.eq(&key))
                .select(CategoryRow::as_select())
                .first::<CategoryRow>(connection)
                .optional()
                .map_err(CategoryStoreError::persistence)?;
            row.map(row_to_category).transpose()
        })
        .await
    }

    async fn update(&self, category: &Category) -> CategoryStoreResult<()> {
        let id = category.id();
        let name = category.name().clone();
        let description = category.description().to_owned();
        let updated_at = category.updated_at();

        self.run_blocking(move |connection| {
            let updated = diesel::update(categories::table.filter(categories::id.eq(id.into_inner())))
                .set((
                    categories::name.eq(name.as_str()),
                    categories::name_key.eq(name.normalized()),
                    categories::description.eq(&description),
                    categories::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| map_write_error(err, id, &name))?;
            if updated == 0 {
                return Err(CategoryStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: CategoryId) -> CategoryStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(categories::table.filter(categories::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(CategoryStoreError::persistence)?;
            if deleted == 0 {
                return Err(CategoryStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn map_write_error(err: DieselError, id: CategoryId, name: &CategoryName) -> CategoryStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info
                .constraint_name()
                .is_some_and(|constraint| constraint == "idx_categories_name") =>
        {
            CategoryStoreError::DuplicateName(name.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CategoryStoreError::DuplicateCategory(id)
        }
        _ => CategoryStoreError::persistence(err),
    }
}

fn row_to_category(row: CategoryRow) -> CategoryStoreResult<Category> {
    let name = CategoryName::new(row.name).map_err(CategoryStoreError::invalid_persisted_data)?;
    Ok(Category::from_persisted(PersistedCategoryData {
        id: CategoryId::from_uuid(row.id),
        name,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    fn row(name: &str) -> CategoryRow {
        let at: DateTime<Utc> = Utc
            .with_ymd_and_hms(2026, 5, 2, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        CategoryRow {
            id: uuid::Uuid::new_v4(),
            name: name.to_owned(),
            description: "Hardware hacks".to_owned(),
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    fn rows_decode_into_categories() {
        let source = row("Hardware");
        let id = source.id;
        let category = row_to_category(source).expect("row should decode");
        assert_eq!(category.id().into_inner(), id);
        assert_eq!(category.name().as_str(), "Hardware");
        assert_eq!(category.description(), "Hardware hacks");
    }

    #[rstest]
    fn rows_with_blank_names_are_invalid_data() {
        assert!(matches!(
            row_to_category(row("  ")),
            Err(CategoryStoreError::InvalidPersistedData(_))
        ));
    }

    #[rstest]
    fn non_unique_errors_stay_persistence_errors() {
        let name = CategoryName::new("Hardware").expect("valid name");
        let mapped = map_write_error(DieselError::NotFound, CategoryId::new(), &name);
        assert!(matches!(mapped, CategoryStoreError::Persistence(_)));
    }
}
