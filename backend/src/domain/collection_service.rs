//! Collection domain service.
//!
//! Implements the driving ports for the creature collection: the enriched
//! catalog listing and the favorite/team toggle state machines. The two
//! invariants enforced here are load-bearing:
//!
//! - an entry exists iff at least one of its flags is set; every mutation
//!   path deletes the row the moment both flags are false;
//! - the battle team never exceeds [`TEAM_CAPACITY`] members, checked before
//!   any mutation and before any external catalog call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    CatalogSource, CollectionCommand, CollectionQuery, CollectionRepository,
    CollectionRepositoryError, ListingPage,
};
use crate::domain::{
    CollectionEntry, CollectionEntryView, CreatureListing, CreatureType, Error,
    SuppliedCreatureData, UserId, TEAM_CAPACITY,
};

/// Collection service implementing [`CollectionQuery`] and
/// [`CollectionCommand`].
pub struct CollectionService<R, C> {
    repository: Arc<R>,
    catalog: Arc<C>,
}

impl<R, C> CollectionService<R, C> {
    /// Create a new service over a repository and a catalog source.
    pub fn new(repository: Arc<R>, catalog: Arc<C>) -> Self {
        Self {
            repository,
            catalog,
        }
    }
}

impl<R, C> Clone for CollectionService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

fn map_repository_error(error: CollectionRepositoryError) -> Error {
    match error {
        CollectionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("collection repository unavailable: {message}"))
        }
        CollectionRepositoryError::Query { message } => {
            Error::internal(format!("collection repository error: {message}"))
        }
    }
}

fn unresolvable_data_error(code: &str) -> Error {
    Error::invalid_request(format!("could not resolve creature data for '{code}'"))
}

fn team_full_error() -> Error {
    Error::invalid_request(format!(
        "battle team is already full (maximum of {TEAM_CAPACITY} creatures)"
    ))
}

impl<R, C> CollectionService<R, C>
where
    R: CollectionRepository,
    C: CatalogSource,
{
    /// Obtain creature data for a new entry: supplied data wins, otherwise a
    /// catalog fetch for the lowercased code. Any failure is the same
    /// business error; a mutation cannot proceed without creature data.
    async fn resolve_creature_data(
        &self,
        code: &str,
        supplied: Option<SuppliedCreatureData>,
    ) -> Result<SuppliedCreatureData, Error> {
        if let Some(data) = supplied {
            return Ok(data);
        }
        match self.catalog.fetch_details(&code.to_lowercase()).await {
            Ok(details) => Ok(details.into()),
            Err(error) => {
                debug!(code, %error, "catalog fallback fetch failed");
                Err(unresolvable_data_error(code))
            }
        }
    }

    /// Resolve the type dimension for the creature's first listed type. Only
    /// the first type is persisted.
    async fn type_for(
        &self,
        code: &str,
        data: &SuppliedCreatureData,
    ) -> Result<CreatureType, Error> {
        let Some(first_type) = data.first_type() else {
            return Err(Error::invalid_request(format!(
                "creature data for '{code}' is missing a type"
            )));
        };
        self.repository
            .find_or_create_type(first_type)
            .await
            .map_err(map_repository_error)
    }

    async fn ensure_team_capacity(&self, user_id: &UserId) -> Result<(), Error> {
        let current = self
            .repository
            .count_team_members(user_id)
            .await
            .map_err(map_repository_error)?;
        if current >= TEAM_CAPACITY {
            return Err(team_full_error());
        }
        Ok(())
    }

    /// Create and persist a brand-new entry for `(user, code)`.
    async fn create_entry(
        &self,
        user_id: &UserId,
        code: &str,
        supplied: Option<SuppliedCreatureData>,
        favorite: bool,
        in_team: bool,
    ) -> Result<CollectionEntry, Error> {
        let data = self.resolve_creature_data(code, supplied).await?;
        let creature_type = self.type_for(code, &data).await?;
        let entry = CollectionEntry::new(
            *user_id,
            creature_type.id,
            code,
            data.name,
            data.image_uri,
            favorite,
            in_team,
        );
        self.repository
            .upsert(&entry)
            .await
            .map_err(map_repository_error)
    }

    /// Persist a flag change, deleting the entry instead when both flags are
    /// now clear.
    async fn save_or_discard(&self, entry: CollectionEntry) -> Result<(), Error> {
        if entry.is_orphaned() {
            self.repository
                .remove(&entry)
                .await
                .map_err(map_repository_error)
        } else {
            self.repository
                .upsert(&entry)
                .await
                .map_err(map_repository_error)
                .map(|_| ())
        }
    }
}

#[async_trait]
impl<R, C> CollectionQuery for CollectionService<R, C>
where
    R: CollectionRepository,
    C: CatalogSource,
{
    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: ListingPage,
        name_filter: Option<String>,
    ) -> Result<Vec<CreatureListing>, Error> {
        let summaries = match self.catalog.list_summaries(page.limit, page.offset).await {
            Ok(summaries) => summaries,
            Err(error) => {
                warn!(%error, "catalog listing unavailable, returning an empty page");
                return Ok(Vec::new());
            }
        };

        let needle = name_filter.map(|filter| filter.to_lowercase());
        let mut listings = Vec::with_capacity(summaries.len());
        for summary in summaries {
            // Filter on the summary name before paying for the detail fetch.
            if let Some(ref needle) = needle {
                if !summary.name.to_lowercase().contains(needle.as_str()) {
                    continue;
                }
            }
            let details = match self.catalog.fetch_details(&summary.name).await {
                Ok(details) => details,
                Err(error) => {
                    debug!(name = %summary.name, %error, "skipping creature that failed to resolve");
                    continue;
                }
            };
            let code = details.code();
            let stored = self
                .repository
                .find_entry(user_id, &code)
                .await
                .map_err(map_repository_error)?;
            let (is_favorite, in_team) =
                stored.map_or((false, false), |entry| (entry.favorite, entry.in_team));
            listings.push(CreatureListing {
                id: details.id,
                code,
                name: details.name,
                types: details.types,
                image_uri: details.image_uri,
                stats: details.stats,
                is_favorite,
                in_team,
            });
        }
        Ok(listings)
    }

    async fn favorites(&self, user_id: &UserId) -> Result<Vec<CollectionEntryView>, Error> {
        let entries = self
            .repository
            .list_favorites(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(entries.iter().map(CollectionEntryView::from_entry).collect())
    }

    async fn team(&self, user_id: &UserId) -> Result<Vec<CollectionEntryView>, Error> {
        let entries = self
            .repository
            .list_team(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(entries.iter().map(CollectionEntryView::from_entry).collect())
    }
}

#[async_trait]
impl<R, C> CollectionCommand for CollectionService<R, C>
where
    R: CollectionRepository,
    C: CatalogSource,
{
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        code: &str,
        supplied: Option<SuppliedCreatureData>,
    ) -> Result<bool, Error> {
        let existing = self
            .repository
            .find_entry(user_id, code)
            .await
            .map_err(map_repository_error)?;

        if let Some(mut entry) = existing {
            entry.favorite = !entry.favorite;
            let favorite = entry.favorite;
            self.save_or_discard(entry).await?;
            return Ok(favorite);
        }

        self.create_entry(user_id, code, supplied, true, false).await?;
        Ok(true)
    }

    async fn toggle_team(
        &self,
        user_id: &UserId,
        code: &str,
        supplied: Option<SuppliedCreatureData>,
    ) -> Result<bool, Error> {
        let existing = self
            .repository
            .find_entry(user_id, code)
            .await
            .map_err(map_repository_error)?;

        if let Some(mut entry) = existing {
            if entry.in_team {
                entry.in_team = false;
                self.save_or_discard(entry).await?;
                return Ok(false);
            }
            self.ensure_team_capacity(user_id).await?;
            entry.in_team = true;
            self.save_or_discard(entry).await?;
            return Ok(true);
        }

        // Capacity first: a full team must not cost a catalog round trip.
        self.ensure_team_capacity(user_id).await?;
        self.create_entry(user_id, code, supplied, false, true).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CatalogSourceError, MockCatalogSource, MockCollectionRepository};
    use crate::domain::ErrorCode;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn service(
        repository: MockCollectionRepository,
        catalog: MockCatalogSource,
    ) -> CollectionService<MockCollectionRepository, MockCatalogSource> {
        CollectionService::new(Arc::new(repository), Arc::new(catalog))
    }

    fn supplied(name: &str, types: &[&str]) -> SuppliedCreatureData {
        SuppliedCreatureData {
            name: name.to_owned(),
            image_uri: format!("https://img.invalid/{name}.png"),
            types: types.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    fn details(id: i64, name: &str) -> crate::domain::CreatureDetails {
        crate::domain::CreatureDetails {
            id,
            name: name.to_owned(),
            image_uri: format!("https://img.invalid/{id}.png"),
            types: vec!["Grass".to_owned()],
            stats: BTreeMap::from([("hp".to_owned(), 45)]),
        }
    }

    fn entry(user_id: UserId, code: &str, favorite: bool, in_team: bool) -> CollectionEntry {
        CollectionEntry::new(user_id, Uuid::new_v4(), code, "bulbasaur", "uri", favorite, in_team)
    }

    fn grass_type() -> CreatureType {
        CreatureType::new("Grass")
    }

    #[tokio::test]
    async fn favoriting_a_new_creature_creates_the_entry_from_supplied_data() {
        let user = UserId::random();
        let creature_type = grass_type();
        let type_id = creature_type.id;
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));
        repo.expect_find_or_create_type()
            .withf(|description| description == "Grass")
            .times(1)
            .return_once(move |_| Ok(creature_type));
        repo.expect_upsert()
            .withf(move |entry| {
                entry.code == "1"
                    && entry.favorite
                    && !entry.in_team
                    && entry.creature_type_id == type_id
                    && entry.name == "Bulbasaur"
            })
            .times(1)
            .returning(|entry| Ok(entry.clone()));
        // Supplied data means no catalog traffic at all.
        catalog.expect_fetch_details().times(0);

        let result = service(repo, catalog)
            .toggle_favorite(&user, "1", Some(supplied("Bulbasaur", &["Grass", "Poison"])))
            .await
            .expect("favorite succeeds");
        assert!(result);
    }

    #[tokio::test]
    async fn unfavoriting_deletes_the_entry_when_not_on_the_team() {
        let user = UserId::random();
        let stored = entry(user, "1", true, false);
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry()
            .times(1)
            .return_once(move |_, _| Ok(Some(stored)));
        repo.expect_remove()
            .withf(|entry| entry.code == "1" && entry.is_orphaned())
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_upsert().times(0);

        let result = service(repo, MockCatalogSource::new())
            .toggle_favorite(&user, "1", None)
            .await
            .expect("unfavorite succeeds");
        assert!(!result);
    }

    #[tokio::test]
    async fn unfavoriting_keeps_the_entry_while_on_the_team() {
        let user = UserId::random();
        let stored = entry(user, "1", true, true);
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry()
            .times(1)
            .return_once(move |_, _| Ok(Some(stored)));
        repo.expect_upsert()
            .withf(|entry| !entry.favorite && entry.in_team)
            .times(1)
            .returning(|entry| Ok(entry.clone()));
        repo.expect_remove().times(0);

        let result = service(repo, MockCatalogSource::new())
            .toggle_favorite(&user, "1", None)
            .await
            .expect("toggle succeeds");
        assert!(!result);
    }

    #[tokio::test]
    async fn favoriting_without_data_falls_back_to_the_catalog() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));
        // The fetch identifier is lowercased for the catalog.
        catalog
            .expect_fetch_details()
            .withf(|identifier| identifier == "pikachu")
            .times(1)
            .returning(|_| Ok(details(25, "Pikachu")));
        repo.expect_find_or_create_type()
            .times(1)
            .returning(|_| Ok(grass_type()));
        repo.expect_upsert()
            .withf(|entry| entry.code == "PIKACHU" && entry.favorite)
            .times(1)
            .returning(|entry| Ok(entry.clone()));

        let result = service(repo, catalog)
            .toggle_favorite(&user, "PIKACHU", None)
            .await
            .expect("favorite succeeds");
        assert!(result);
    }

    #[tokio::test]
    async fn unresolvable_creature_data_is_a_business_error() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));
        catalog
            .expect_fetch_details()
            .times(1)
            .returning(|_| Err(CatalogSourceError::NotFound));
        repo.expect_upsert().times(0);

        let error = service(repo, catalog)
            .toggle_favorite(&user, "0", None)
            .await
            .expect_err("favorite fails");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(error.message().contains("could not resolve"));
    }

    #[tokio::test]
    async fn adding_a_seventh_member_fails_before_any_catalog_call() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));
        repo.expect_count_team_members().times(1).returning(|_| Ok(6));
        catalog.expect_fetch_details().times(0);
        repo.expect_upsert().times(0);

        let error = service(repo, catalog)
            .toggle_team(&user, "7", None)
            .await
            .expect_err("team add fails");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(error.message().contains("full"));
    }

    #[tokio::test]
    async fn capacity_also_guards_existing_entries_joining_the_team() {
        let user = UserId::random();
        let stored = entry(user, "1", true, false);
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry()
            .times(1)
            .return_once(move |_, _| Ok(Some(stored)));
        repo.expect_count_team_members().times(1).returning(|_| Ok(6));
        repo.expect_upsert().times(0);

        let error = service(repo, MockCatalogSource::new())
            .toggle_team(&user, "1", None)
            .await
            .expect_err("team add fails");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn leaving_the_team_deletes_the_entry_unless_favorited() {
        let user = UserId::random();
        let stored = entry(user, "2", false, true);
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry()
            .times(1)
            .return_once(move |_, _| Ok(Some(stored)));
        repo.expect_remove().times(1).returning(|_| Ok(()));
        repo.expect_upsert().times(0);

        let result = service(repo, MockCatalogSource::new())
            .toggle_team(&user, "2", None)
            .await
            .expect("removal succeeds");
        assert!(!result);
    }

    #[tokio::test]
    async fn leaving_the_team_keeps_a_favorited_entry() {
        let user = UserId::random();
        let stored = entry(user, "2", true, true);
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry()
            .times(1)
            .return_once(move |_, _| Ok(Some(stored)));
        repo.expect_upsert()
            .withf(|entry| entry.favorite && !entry.in_team)
            .times(1)
            .returning(|entry| Ok(entry.clone()));
        repo.expect_remove().times(0);

        let result = service(repo, MockCatalogSource::new())
            .toggle_team(&user, "2", None)
            .await
            .expect("removal succeeds");
        assert!(!result);
    }

    #[tokio::test]
    async fn an_existing_entry_can_join_a_team_with_room() {
        let user = UserId::random();
        let stored = entry(user, "1", true, false);
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry()
            .times(1)
            .return_once(move |_, _| Ok(Some(stored)));
        repo.expect_count_team_members().times(1).returning(|_| Ok(3));
        repo.expect_upsert()
            .withf(|entry| entry.favorite && entry.in_team)
            .times(1)
            .returning(|entry| Ok(entry.clone()));

        let result = service(repo, MockCatalogSource::new())
            .toggle_team(&user, "1", None)
            .await
            .expect("team add succeeds");
        assert!(result);
    }

    #[tokio::test]
    async fn a_new_team_member_is_created_without_the_favorite_flag() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));
        repo.expect_count_team_members().times(1).returning(|_| Ok(0));
        repo.expect_find_or_create_type()
            .times(1)
            .returning(|_| Ok(grass_type()));
        repo.expect_upsert()
            .withf(|entry| !entry.favorite && entry.in_team && entry.code == "2")
            .times(1)
            .returning(|entry| Ok(entry.clone()));

        let result = service(repo, MockCatalogSource::new())
            .toggle_team(&user, "2", Some(supplied("Ivysaur", &["Grass"])))
            .await
            .expect("team add succeeds");
        assert!(result);
    }

    #[tokio::test]
    async fn creature_data_without_a_type_is_rejected() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();

        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));
        repo.expect_find_or_create_type().times(0);
        repo.expect_upsert().times(0);

        let error = service(repo, MockCatalogSource::new())
            .toggle_favorite(&user, "1", Some(supplied("Missingno", &[])))
            .await
            .expect_err("favorite fails");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(error.message().contains("missing a type"));
    }

    #[tokio::test]
    async fn listing_merges_stored_flags_in_catalog_order() {
        let user = UserId::random();
        let favorite = entry(user, "1", true, false);
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        catalog.expect_list_summaries().times(1).returning(|_, _| {
            Ok(vec![
                crate::domain::CreatureSummary {
                    name: "bulbasaur".to_owned(),
                    reference_url: "u1".to_owned(),
                },
                crate::domain::CreatureSummary {
                    name: "ivysaur".to_owned(),
                    reference_url: "u2".to_owned(),
                },
            ])
        });
        catalog.expect_fetch_details().times(2).returning(|name| {
            if name == "bulbasaur" {
                Ok(details(1, "Bulbasaur"))
            } else {
                Ok(details(2, "Ivysaur"))
            }
        });
        repo.expect_find_entry().times(2).returning(move |_, code| {
            if code == "1" {
                Ok(Some(favorite.clone()))
            } else {
                Ok(None)
            }
        });

        let listings = service(repo, catalog)
            .list_for_user(&user, ListingPage::default(), None)
            .await
            .expect("listing succeeds");

        assert_eq!(listings.len(), 2);
        let first = listings.first().expect("first item");
        assert_eq!(first.code, "1");
        assert!(first.is_favorite);
        assert!(!first.in_team);
        let second = listings.get(1).expect("second item");
        assert_eq!(second.code, "2");
        assert!(!second.is_favorite);
        assert!(!second.in_team);
    }

    #[tokio::test]
    async fn an_unavailable_catalog_yields_an_empty_listing() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        catalog
            .expect_list_summaries()
            .times(1)
            .returning(|_, _| Err(CatalogSourceError::transport("connection refused")));
        repo.expect_find_entry().times(0);

        let listings = service(repo, catalog)
            .list_for_user(&user, ListingPage::default(), None)
            .await
            .expect("listing degrades to empty");
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn creatures_that_fail_to_resolve_are_skipped() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        catalog.expect_list_summaries().times(1).returning(|_, _| {
            Ok(vec![
                crate::domain::CreatureSummary {
                    name: "bulbasaur".to_owned(),
                    reference_url: "u1".to_owned(),
                },
                crate::domain::CreatureSummary {
                    name: "missingno".to_owned(),
                    reference_url: "u2".to_owned(),
                },
            ])
        });
        catalog.expect_fetch_details().times(2).returning(|name| {
            if name == "bulbasaur" {
                Ok(details(1, "Bulbasaur"))
            } else {
                Err(CatalogSourceError::NotFound)
            }
        });
        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));

        let listings = service(repo, catalog)
            .list_for_user(&user, ListingPage::default(), None)
            .await
            .expect("listing succeeds");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings.first().map(|l| l.code.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn the_name_filter_runs_before_the_detail_fetch() {
        let user = UserId::random();
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        catalog.expect_list_summaries().times(1).returning(|_, _| {
            Ok(vec![
                crate::domain::CreatureSummary {
                    name: "bulbasaur".to_owned(),
                    reference_url: "u1".to_owned(),
                },
                crate::domain::CreatureSummary {
                    name: "ivysaur".to_owned(),
                    reference_url: "u2".to_owned(),
                },
            ])
        });
        // Only the match is ever resolved.
        catalog
            .expect_fetch_details()
            .withf(|name| name == "ivysaur")
            .times(1)
            .returning(|_| Ok(details(2, "Ivysaur")));
        repo.expect_find_entry().times(1).returning(|_, _| Ok(None));

        let listings = service(repo, catalog)
            .list_for_user(&user, ListingPage::default(), Some("IVY".to_owned()))
            .await
            .expect("listing succeeds");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings.first().map(|l| l.name.as_str()), Some("Ivysaur"));
    }

    #[tokio::test]
    async fn stored_listings_format_entries_without_catalog_traffic() {
        let user = UserId::random();
        let stored = entry(user, "1", true, false);
        let mut repo = MockCollectionRepository::new();
        let mut catalog = MockCatalogSource::new();

        repo.expect_list_favorites()
            .times(1)
            .return_once(move |_| Ok(vec![stored]));
        catalog.expect_list_summaries().times(0);
        catalog.expect_fetch_details().times(0);

        let views = service(repo, catalog)
            .favorites(&user)
            .await
            .expect("favorites succeed");
        assert_eq!(views.len(), 1);
        let view = views.first().expect("one view");
        assert_eq!(view.name, "Bulbasaur");
        assert!(view.is_favorite);
    }
}
