//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CollectionCommand, CollectionQuery, IdentityService, TokenService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityService>,
    pub collection_queries: Arc<dyn CollectionQuery>,
    pub collection_commands: Arc<dyn CollectionCommand>,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(
        identity: Arc<dyn IdentityService>,
        collection_queries: Arc<dyn CollectionQuery>,
        collection_commands: Arc<dyn CollectionCommand>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            identity,
            collection_queries,
            collection_commands,
            tokens,
        }
    }
}
