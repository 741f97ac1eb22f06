//! Port for per-user collection persistence.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{CollectionEntry, CreatureType, UserId};

/// Persistence errors raised by collection repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionRepositoryError {
    /// Repository connection could not be established.
    #[error("collection repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("collection repository query failed: {message}")]
    Query { message: String },
}

impl CollectionRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence boundary for collection entries and the type dimension.
///
/// Writes are write-through: a returned `Ok` means the row is durable. The
/// `(user_id, code)` uniqueness is owned by the adapter; `upsert` must treat
/// that pair as the conflict key so concurrent toggles degrade to
/// last-writer-wins rather than duplicate rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Look up a user's entry for one catalog code.
    async fn find_entry(
        &self,
        user_id: &UserId,
        code: &str,
    ) -> Result<Option<CollectionEntry>, CollectionRepositoryError>;

    /// Count the user's current battle team members.
    async fn count_team_members(&self, user_id: &UserId)
        -> Result<i64, CollectionRepositoryError>;

    /// Insert or update an entry, returning the persisted row.
    async fn upsert(
        &self,
        entry: &CollectionEntry,
    ) -> Result<CollectionEntry, CollectionRepositoryError>;

    /// Delete an entry.
    async fn remove(&self, entry: &CollectionEntry) -> Result<(), CollectionRepositoryError>;

    /// Fetch the type dimension row for a description, creating it on first
    /// use. Idempotent by description.
    async fn find_or_create_type(
        &self,
        description: &str,
    ) -> Result<CreatureType, CollectionRepositoryError>;

    /// All entries the user marked as favorite.
    async fn list_favorites(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError>;

    /// The user's battle team.
    async fn list_team(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    entries: Vec<CollectionEntry>,
    types: Vec<CreatureType>,
}

/// In-memory repository for tests; mirrors the adapter contract including
/// upsert-by-(user, code) semantics.
#[derive(Debug, Default)]
pub struct InMemoryCollectionRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryCollectionRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        // A poisoned lock only happens after a panic in another test thread.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CollectionRepository for InMemoryCollectionRepository {
    async fn find_entry(
        &self,
        user_id: &UserId,
        code: &str,
    ) -> Result<Option<CollectionEntry>, CollectionRepositoryError> {
        Ok(self
            .lock()
            .entries
            .iter()
            .find(|entry| entry.user_id == *user_id && entry.code == code)
            .cloned())
    }

    async fn count_team_members(
        &self,
        user_id: &UserId,
    ) -> Result<i64, CollectionRepositoryError> {
        Ok(self
            .lock()
            .entries
            .iter()
            .filter(|entry| entry.user_id == *user_id && entry.in_team)
            .count() as i64)
    }

    async fn upsert(
        &self,
        entry: &CollectionEntry,
    ) -> Result<CollectionEntry, CollectionRepositoryError> {
        let mut state = self.lock();
        if let Some(existing) = state
            .entries
            .iter_mut()
            .find(|candidate| candidate.user_id == entry.user_id && candidate.code == entry.code)
        {
            let id = existing.id;
            *existing = entry.clone();
            existing.id = id;
            return Ok(existing.clone());
        }
        state.entries.push(entry.clone());
        Ok(entry.clone())
    }

    async fn remove(&self, entry: &CollectionEntry) -> Result<(), CollectionRepositoryError> {
        self.lock().entries.retain(|candidate| candidate.id != entry.id);
        Ok(())
    }

    async fn find_or_create_type(
        &self,
        description: &str,
    ) -> Result<CreatureType, CollectionRepositoryError> {
        let mut state = self.lock();
        if let Some(existing) = state
            .types
            .iter()
            .find(|candidate| candidate.description == description)
        {
            return Ok(existing.clone());
        }
        let created = CreatureType::new(description);
        state.types.push(created.clone());
        Ok(created)
    }

    async fn list_favorites(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError> {
        Ok(self
            .lock()
            .entries
            .iter()
            .filter(|entry| entry.user_id == *user_id && entry.favorite)
            .cloned()
            .collect())
    }

    async fn list_team(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError> {
        Ok(self
            .lock()
            .entries
            .iter()
            .filter(|entry| entry.user_id == *user_id && entry.in_team)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(user_id: UserId, code: &str, favorite: bool, in_team: bool) -> CollectionEntry {
        CollectionEntry::new(user_id, Uuid::new_v4(), code, "bulbasaur", "uri", favorite, in_team)
    }

    #[tokio::test]
    async fn upsert_replaces_by_user_and_code() {
        let repo = InMemoryCollectionRepository::default();
        let user = UserId::random();

        let first = repo.upsert(&entry(user, "1", true, false)).await.expect("insert");
        let mut updated = entry(user, "1", true, true);
        updated.id = Uuid::new_v4();
        let stored = repo.upsert(&updated).await.expect("update");

        // The original row id survives the upsert.
        assert_eq!(stored.id, first.id);
        assert_eq!(repo.count_team_members(&user).await.expect("count"), 1);
        let found = repo.find_entry(&user, "1").await.expect("lookup").expect("entry");
        assert!(found.favorite && found.in_team);
    }

    #[tokio::test]
    async fn find_or_create_type_is_idempotent_by_description() {
        let repo = InMemoryCollectionRepository::default();

        let first = repo.find_or_create_type("Grass").await.expect("create");
        let second = repo.find_or_create_type("Grass").await.expect("find");
        assert_eq!(first.id, second.id);

        let other = repo.find_or_create_type("Poison").await.expect("create");
        assert_ne!(other.id, first.id);
    }

    #[tokio::test]
    async fn listings_are_scoped_per_user_and_flag() {
        let repo = InMemoryCollectionRepository::default();
        let user = UserId::random();
        let stranger = UserId::random();

        repo.upsert(&entry(user, "1", true, false)).await.expect("fav");
        repo.upsert(&entry(user, "2", false, true)).await.expect("team");
        repo.upsert(&entry(stranger, "3", true, true)).await.expect("other");

        let favorites = repo.list_favorites(&user).await.expect("favorites");
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.first().map(|e| e.code.as_str()), Some("1"));

        let team = repo.list_team(&user).await.expect("team");
        assert_eq!(team.len(), 1);
        assert_eq!(team.first().map(|e| e.code.as_str()), Some("2"));
    }
}
