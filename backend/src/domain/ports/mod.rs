//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`CatalogSource`], [`CollectionRepository`],
//! [`UserRepository`], [`PasswordHasher`], [`TokenService`]) are implemented
//! by outbound adapters and raise small port-specific errors. Driving ports
//! ([`IdentityService`], [`CollectionQuery`], [`CollectionCommand`]) are
//! called by inbound adapters and return `domain::Error` directly.

mod catalog_source;
mod collection_repository;
mod collection_usecases;
mod identity_service;
mod password_hasher;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use catalog_source::MockCatalogSource;
pub use catalog_source::{CatalogSource, CatalogSourceError, FixtureCatalogSource};
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{
    CollectionRepository, CollectionRepositoryError, InMemoryCollectionRepository,
};
#[cfg(test)]
pub use collection_usecases::{MockCollectionCommand, MockCollectionQuery};
pub use collection_usecases::{CollectionCommand, CollectionQuery, ListingPage};
#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use identity_service::IdentityService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenService, TokenServiceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{InMemoryUserRepository, UserPersistenceError, UserRepository};
