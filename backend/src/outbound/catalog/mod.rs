//! Catalog outbound adapter.
//!
//! A thin reqwest implementation of the `CatalogSource` port against a
//! PokeAPI-compatible service.

mod dto;
mod http_client;

pub use http_client::PokeApiClient;
