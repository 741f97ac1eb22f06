//! Driving ports for the collection use-cases.

use async_trait::async_trait;

use crate::domain::{
    CollectionEntryView, CreatureListing, Error, SuppliedCreatureData, UserId,
};

/// Page window for the enriched catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPage {
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListingPage {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

/// Read side: catalog-enriched and store-only listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionQuery: Send + Sync {
    /// One catalog page merged with the user's stored flags. A failing
    /// catalog page yields an empty sequence, never an error.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: ListingPage,
        name_filter: Option<String>,
    ) -> Result<Vec<CreatureListing>, Error>;

    /// The user's stored favorites, formatted for output.
    async fn favorites(&self, user_id: &UserId) -> Result<Vec<CollectionEntryView>, Error>;

    /// The user's battle team, formatted for output.
    async fn team(&self, user_id: &UserId) -> Result<Vec<CollectionEntryView>, Error>;
}

/// Write side: the favorite and team toggle state machines.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionCommand: Send + Sync {
    /// Flip the favorite flag for `(user, code)`, creating or deleting the
    /// entry as required. Returns the new favorite state.
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        code: &str,
        supplied: Option<SuppliedCreatureData>,
    ) -> Result<bool, Error>;

    /// Flip team membership for `(user, code)`, enforcing the team capacity
    /// before any mutation or external fetch. Returns the new membership.
    async fn toggle_team(
        &self,
        user_id: &UserId,
        code: &str,
        supplied: Option<SuppliedCreatureData>,
    ) -> Result<bool, Error>;
}
