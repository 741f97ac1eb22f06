//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Conversions into domain types live next to the row definitions.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{CollectionEntry, CreatureType, User, UserId};

use super::schema::{collection_entries, creature_types, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            login: row.login,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for creating new user records. Timestamps come from
/// the database defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub login: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_domain(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: &user.name,
            login: &user.login,
            email: &user.email,
            password_hash: &user.password_hash,
        }
    }
}

/// Row struct for the creature type dimension.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = creature_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CreatureTypeRow {
    pub id: Uuid,
    pub description: String,
}

impl From<CreatureTypeRow> for CreatureType {
    fn from(row: CreatureTypeRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
        }
    }
}

/// Row struct for collection entries; doubles as the insert shape since
/// every column is application-supplied.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = collection_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CollectionEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub creature_type_id: Uuid,
    pub code: String,
    pub name: String,
    pub image_uri: String,
    pub favorite: bool,
    pub in_team: bool,
}

impl From<CollectionEntryRow> for CollectionEntry {
    fn from(row: CollectionEntryRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            creature_type_id: row.creature_type_id,
            code: row.code,
            name: row.name,
            image_uri: row.image_uri,
            favorite: row.favorite,
            in_team: row.in_team,
        }
    }
}

impl CollectionEntryRow {
    pub(crate) fn from_domain(entry: &CollectionEntry) -> Self {
        Self {
            id: entry.id,
            user_id: *entry.user_id.as_uuid(),
            creature_type_id: entry.creature_type_id,
            code: entry.code.clone(),
            name: entry.name.clone(),
            image_uri: entry.image_uri.clone(),
            favorite: entry.favorite,
            in_team: entry.in_team,
        }
    }
}
