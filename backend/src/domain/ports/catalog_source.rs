//! Port for the external read-only creature catalog.

use async_trait::async_trait;

use crate::domain::{CreatureDetails, CreatureSummary};

/// Failures raised by catalog source adapters.
///
/// Missing creatures are a sentinel, not a transport failure: callers decide
/// whether `NotFound` is an error for their use-case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogSourceError {
    /// The catalog has no creature under the requested identifier.
    #[error("catalog entry not found")]
    NotFound,
    /// The request hit the fixed per-call network timeout.
    #[error("catalog request timed out: {message}")]
    Timeout { message: String },
    /// Connection or protocol-level failure.
    #[error("catalog transport failed: {message}")]
    Transport { message: String },
    /// The response arrived but could not be decoded into creature data.
    #[error("catalog payload could not be decoded: {message}")]
    Decode { message: String },
}

impl CatalogSourceError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Read-only access to the external creature catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of creature summaries. The caller controls pagination.
    async fn list_summaries(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CreatureSummary>, CatalogSourceError>;

    /// Fetch full details for a creature by name or numeric id.
    async fn fetch_details(&self, identifier: &str)
        -> Result<CreatureDetails, CatalogSourceError>;
}

/// In-memory catalog backed by a fixed set of creatures.
///
/// Summaries are served from the same set, in insertion order, honouring
/// limit/offset. Used by handler and end-to-end tests in place of the HTTP
/// adapter.
#[derive(Debug, Default, Clone)]
pub struct FixtureCatalogSource {
    creatures: Vec<CreatureDetails>,
}

impl FixtureCatalogSource {
    /// Build a fixture catalog serving exactly the given creatures.
    pub fn with_creatures(creatures: Vec<CreatureDetails>) -> Self {
        Self { creatures }
    }
}

#[async_trait]
impl CatalogSource for FixtureCatalogSource {
    async fn list_summaries(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CreatureSummary>, CatalogSourceError> {
        Ok(self
            .creatures
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|details| CreatureSummary {
                name: details.name.to_lowercase(),
                reference_url: format!("https://catalog.invalid/pokemon/{}/", details.id),
            })
            .collect())
    }

    async fn fetch_details(
        &self,
        identifier: &str,
    ) -> Result<CreatureDetails, CatalogSourceError> {
        self.creatures
            .iter()
            .find(|details| {
                details.name.eq_ignore_ascii_case(identifier) || details.code() == identifier
            })
            .cloned()
            .ok_or(CatalogSourceError::NotFound)
    }
}
