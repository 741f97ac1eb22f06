//! Domain entities, errors, ports, and services.
//!
//! Everything in this module is transport and storage agnostic. Inbound
//! adapters translate domain errors into HTTP responses; outbound adapters
//! implement the ports declared under [`ports`].

pub mod catalog;
pub mod collection;
pub mod collection_service;
pub mod error;
pub mod identity_service;
pub mod ports;
pub mod user;

pub use self::catalog::{capitalize, CreatureDetails, CreatureSummary, SuppliedCreatureData};
pub use self::collection::{
    CollectionEntry, CollectionEntryView, CreatureListing, CreatureType, TEAM_CAPACITY,
};
pub use self::collection_service::CollectionService;
pub use self::error::{Error, ErrorCode};
pub use self::identity_service::IdentityServiceImpl;
pub use self::user::{
    AccessToken, LoginCredentials, LoginValidationError, RegistrationRequest,
    RegistrationValidationError, User, UserId,
};

/// Convenient result alias for domain use-cases.
pub type ApiResult<T> = Result<T, Error>;
