//! Categories that group an event's teams by theme.

use super::CategoryDomainError;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const MAX_NAME_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Unique category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
    /// Creates a random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated category name, unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Creates a validated name.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryDomainError`] when the trimmed name is empty or too
    /// long.
    pub fn new(value: impl Into<String>) -> Result<Self, CategoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CategoryDomainError::EmptyName);
        }
        if trimmed.chars().count() > MAX_NAME_CHARS {
            return Err(CategoryDomainError::NameTooLong(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lower-cased form used for uniqueness.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CategoryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An event category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCategoryData {
    /// Persisted identifier.
    pub id: CategoryId,
    /// Persisted name.
    pub name: CategoryName,
    /// Persisted description.
    pub description: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryDomainError::DescriptionTooLong`] when the
    /// description exceeds the limit.
    pub fn new(
        name: CategoryName,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, CategoryDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: CategoryId::new(),
            name,
            description: validated_description(description.into())?,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a category from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCategoryData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &CategoryName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the name and description.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryDomainError::DescriptionTooLong`] when the
    /// description exceeds the limit.
    pub fn revise(
        &mut self,
        name: CategoryName,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), CategoryDomainError> {
        self.description = validated_description(description.into())?;
        self.name = name;
        self.updated_at = clock.utc();
        Ok(())
    }
}

fn validated_description(description: String) -> Result<String, CategoryDomainError> {
    let trimmed = description.trim();
    if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(CategoryDomainError::DescriptionTooLong);
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use rstest::rstest;

    #[rstest]
    #[case("", CategoryDomainError::EmptyName)]
    #[case("   ", CategoryDomainError::EmptyName)]
    fn blank_names_are_rejected(#[case] raw: &str, #[case] expected: CategoryDomainError) {
        assert_eq!(CategoryName::new(raw), Err(expected));
    }

    #[rstest]
    fn long_names_are_rejected() {
        let raw = "n".repeat(101);
        assert_eq!(
            CategoryName::new(raw.clone()),
            Err(CategoryDomainError::NameTooLong(raw))
        );
    }

    #[rstest]
    fn revise_refreshes_update_timestamp() {
        let name = CategoryName::new("Health").expect("valid name");
        let mut category = Category::new(name, "Med tech", &DefaultClock).expect("valid");
        let created = category.created_at();

        let renamed = CategoryName::new("Healthcare").expect("valid name");
        category
            .revise(renamed, "Medical technology", &DefaultClock)
            .expect("revise should succeed");

        assert_eq!(category.name().as_str(), "Healthcare");
        assert_eq!(category.description(), "Medical technology");
        assert_eq!(category.created_at(), created);
        assert!(category.updated_at() >= created);
    }

    #[rstest]
    fn oversized_descriptions_are_rejected() {
        let name = CategoryName::new("Energy").expect("valid name");
        let result = Category::new(name, "d".repeat(2001), &DefaultClock);
        assert_eq!(result, Err(CategoryDomainError::DescriptionTooLong));
    }
}
