//! PostgreSQL-backed `CollectionRepository` implementation.
//!
//! The entry upsert conflicts on `(user_id, code)`, the table's unique key,
//! so concurrent toggles for the same pair degrade to last-writer-wins
//! instead of duplicate rows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError};
use crate::domain::{CollectionEntry, CreatureType, UserId};

use super::models::{CollectionEntryRow, CreatureTypeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{collection_entries, creature_types};

/// Diesel-backed implementation of the `CollectionRepository` port.
#[derive(Clone)]
pub struct DieselCollectionRepository {
    pool: DbPool,
}

impl DieselCollectionRepository {
    /// Create a new repository over a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CollectionRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CollectionRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CollectionRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CollectionRepositoryError::connection("database connection error")
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            CollectionRepositoryError::query("database error")
        }
    }
}

#[async_trait]
impl CollectionRepository for DieselCollectionRepository {
    async fn find_entry(
        &self,
        user_id: &UserId,
        code: &str,
    ) -> Result<Option<CollectionEntry>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CollectionEntryRow> = collection_entries::table
            .filter(collection_entries::user_id.eq(user_id.as_uuid()))
            .filter(collection_entries::code.eq(code))
            .select(CollectionEntryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn count_team_members(
        &self,
        user_id: &UserId,
    ) -> Result<i64, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        collection_entries::table
            .filter(collection_entries::user_id.eq(user_id.as_uuid()))
            .filter(collection_entries::in_team.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn upsert(
        &self,
        entry: &CollectionEntry,
    ) -> Result<CollectionEntry, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CollectionEntryRow = diesel::insert_into(collection_entries::table)
            .values(CollectionEntryRow::from_domain(entry))
            .on_conflict((collection_entries::user_id, collection_entries::code))
            .do_update()
            .set((
                collection_entries::creature_type_id
                    .eq(excluded(collection_entries::creature_type_id)),
                collection_entries::name.eq(excluded(collection_entries::name)),
                collection_entries::image_uri.eq(excluded(collection_entries::image_uri)),
                collection_entries::favorite.eq(excluded(collection_entries::favorite)),
                collection_entries::in_team.eq(excluded(collection_entries::in_team)),
            ))
            .returning(CollectionEntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn remove(&self, entry: &CollectionEntry) -> Result<(), CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(collection_entries::table.find(entry.id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_or_create_type(
        &self,
        description: &str,
    ) -> Result<CreatureType, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Insert-if-absent, then read back: idempotent by description and
        // race-safe under the unique constraint.
        diesel::insert_into(creature_types::table)
            .values(CreatureTypeRow {
                id: uuid::Uuid::new_v4(),
                description: description.to_owned(),
            })
            .on_conflict(creature_types::description)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let row: CreatureTypeRow = creature_types::table
            .filter(creature_types::description.eq(description))
            .select(CreatureTypeRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn list_favorites(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CollectionEntryRow> = collection_entries::table
            .filter(collection_entries::user_id.eq(user_id.as_uuid()))
            .filter(collection_entries::favorite.eq(true))
            .select(CollectionEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_team(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CollectionEntryRow> = collection_entries::table
            .filter(collection_entries::user_id.eq(user_id.as_uuid()))
            .filter(collection_entries::in_team.eq(true))
            .select(CollectionEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
