//! Diesel schema for category persistence.

diesel::table! {
    /// Event categories.
    categories (id) {
        /// Category identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Lower-cased name, unique.
        #[max_length = 100]
        name_key -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
