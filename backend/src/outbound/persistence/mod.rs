//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel row structs and
//! domain types; no business logic lives here. Row structs (`models.rs`) and
//! table definitions (`schema.rs`) are internal implementation details.
//! Connections come from a `bb8` pool with native async support via
//! `diesel-async`.

mod diesel_collection_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_collection_repository::DieselCollectionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
