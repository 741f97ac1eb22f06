//! Value types describing creatures as the external catalog reports them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One item of a paginated catalog listing: a creature name and the URL the
/// catalog uses to reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureSummary {
    pub name: String,
    pub reference_url: String,
}

/// Canonical creature details extracted from a catalog payload.
///
/// `name` and `types` are already capitalized; `code` for persistence is the
/// catalog id rendered as a string (see [`CreatureDetails::code`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureDetails {
    pub id: i64,
    pub name: String,
    pub image_uri: String,
    pub types: Vec<String>,
    pub stats: BTreeMap<String, i64>,
}

impl CreatureDetails {
    /// The stable per-creature catalog code used as the collection key.
    pub fn code(&self) -> String {
        self.id.to_string()
    }
}

/// Creature data a mutation caller may supply to avoid a catalog round trip.
///
/// This is the structured replacement for a free-form request body: either
/// the whole shape is present and well-formed, or the caller supplied
/// nothing and the service falls back to fetching from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuppliedCreatureData {
    pub name: String,
    pub image_uri: String,
    pub types: Vec<String>,
}

impl SuppliedCreatureData {
    /// The first listed type, the only one persisted.
    pub fn first_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

impl From<CreatureDetails> for SuppliedCreatureData {
    fn from(details: CreatureDetails) -> Self {
        Self {
            name: details.name,
            image_uri: details.image_uri,
            types: details.types,
        }
    }
}

/// Capitalize a catalog name: first letter uppercased, remainder lowercased.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
