//! Collection entities: the per-user relationship to a catalog creature.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::capitalize;
use super::user::UserId;

/// Maximum number of creatures a user's battle team may hold.
pub const TEAM_CAPACITY: i64 = 6;

/// Normalized creature type dimension, created lazily on first use and never
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureType {
    pub id: Uuid,
    pub description: String,
}

impl CreatureType {
    /// Build a new type dimension row with a random id.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
        }
    }
}

/// A user's relationship record to one catalog creature.
///
/// ## Invariants
/// - At most one entry exists per `(user_id, code)` pair.
/// - An entry exists iff `favorite || in_team`; both mutation paths delete
///   the record the moment both flags are false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub creature_type_id: Uuid,
    pub code: String,
    pub name: String,
    pub image_uri: String,
    pub favorite: bool,
    pub in_team: bool,
}

impl CollectionEntry {
    /// Build a new entry with a random id.
    pub fn new(
        user_id: UserId,
        creature_type_id: Uuid,
        code: impl Into<String>,
        name: impl Into<String>,
        image_uri: impl Into<String>,
        favorite: bool,
        in_team: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            creature_type_id,
            code: code.into(),
            name: name.into(),
            image_uri: image_uri.into(),
            favorite,
            in_team,
        }
    }

    /// True when neither flag justifies keeping the record.
    pub fn is_orphaned(&self) -> bool {
        !self.favorite && !self.in_team
    }
}

/// Listing record merging live catalog data with the user's stored flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatureListing {
    /// Catalog numeric id.
    pub id: i64,
    /// Catalog code (the id as a string), the collection key.
    pub code: String,
    /// Capitalized display name.
    pub name: String,
    pub types: Vec<String>,
    pub image_uri: String,
    /// Base stat values keyed by stat name.
    pub stats: BTreeMap<String, i64>,
    pub is_favorite: bool,
    pub in_team: bool,
}

/// Output record for stored entries (favorites/team listings); sourced only
/// from the store, no catalog re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntryView {
    /// Local record id.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub entry_id: Uuid,
    pub code: String,
    pub name: String,
    pub image_uri: String,
    pub is_favorite: bool,
    pub in_team: bool,
}

impl CollectionEntryView {
    /// Format a stored entry for output.
    pub fn from_entry(entry: &CollectionEntry) -> Self {
        Self {
            entry_id: entry.id,
            code: entry.code.clone(),
            name: capitalize(&entry.name),
            image_uri: entry.image_uri.clone(),
            is_favorite: entry.favorite,
            in_team: entry.in_team,
        }
    }
}
