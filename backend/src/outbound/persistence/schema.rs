//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the migrations exactly; regenerate with
//! `diesel print-schema` after schema changes.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        login -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Normalized creature type dimension.
    creature_types (id) {
        id -> Uuid,
        description -> Varchar,
    }
}

diesel::table! {
    /// Per-user collection entries (favorite / battle team flags).
    collection_entries (id) {
        id -> Uuid,
        user_id -> Uuid,
        creature_type_id -> Uuid,
        code -> Varchar,
        name -> Varchar,
        image_uri -> Varchar,
        favorite -> Bool,
        in_team -> Bool,
    }
}

diesel::joinable!(collection_entries -> users (user_id));
diesel::joinable!(collection_entries -> creature_types (creature_type_id));

diesel::allow_tables_to_appear_in_same_query!(collection_entries, creature_types, users);
