//! Reqwest-backed catalog source adapter.
//!
//! Owns transport details only: request construction, the fixed per-call
//! timeout, HTTP status mapping, and JSON decoding into domain types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::dto::{CreatureDetailsDto, CreaturePageDto};
use crate::domain::ports::{CatalogSource, CatalogSourceError};
use crate::domain::{CreatureDetails, CreatureSummary};

const DEFAULT_USER_AGENT: &str = concat!("pokedex-backend/", env!("CARGO_PKG_VERSION"));

/// Catalog adapter performing GET requests against one base URL, e.g.
/// `https://pokeapi.co/api/v2/`.
pub struct PokeApiClient {
    client: Client,
    base_url: Url,
}

impl PokeApiClient {
    /// Build an adapter with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogSourceError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|error| CatalogSourceError::transport(format!("invalid catalog URL: {error}")))?;

        let response = self.client.get(url).send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogSourceError::NotFound);
        }
        if !status.is_success() {
            return Err(CatalogSourceError::transport(format!(
                "status {}",
                status.as_u16()
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|error| CatalogSourceError::decode(error.to_string()))
    }
}

fn map_transport_error(error: reqwest::Error) -> CatalogSourceError {
    if error.is_timeout() {
        CatalogSourceError::timeout(error.to_string())
    } else {
        CatalogSourceError::transport(error.to_string())
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn list_summaries(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CreatureSummary>, CatalogSourceError> {
        let page: CreaturePageDto = self
            .get_json(&format!("pokemon?limit={limit}&offset={offset}"))
            .await?;
        Ok(page.into_domain())
    }

    async fn fetch_details(
        &self,
        identifier: &str,
    ) -> Result<CreatureDetails, CatalogSourceError> {
        let dto: CreatureDetailsDto = self.get_json(&format!("pokemon/{identifier}")).await?;
        dto.into_domain().map_err(CatalogSourceError::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_against_the_public_base_url() {
        let base = Url::parse("https://pokeapi.co/api/v2/").expect("base url");
        let client = PokeApiClient::new(base, Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn relative_paths_resolve_under_the_base_url() {
        let base = Url::parse("https://pokeapi.co/api/v2/").expect("base url");
        let listing = base.join("pokemon?limit=20&offset=0").expect("join");
        assert_eq!(
            listing.as_str(),
            "https://pokeapi.co/api/v2/pokemon?limit=20&offset=0"
        );
        let details = base.join("pokemon/bulbasaur").expect("join");
        assert_eq!(details.as_str(), "https://pokeapi.co/api/v2/pokemon/bulbasaur");
    }
}
