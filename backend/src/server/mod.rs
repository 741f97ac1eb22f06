//! Server construction and dependency wiring.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{CollectionCommand, CollectionQuery};
use crate::domain::{CollectionService, IdentityServiceImpl};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{collection, identity};
use crate::outbound::catalog::PokeApiClient;
use crate::outbound::persistence::{
    run_pending_migrations, DbPool, DieselCollectionRepository, DieselUserRepository, PoolConfig,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

/// Wire the production adapters into the HTTP handler state.
///
/// # Errors
///
/// Fails when the catalog HTTP client cannot be constructed.
pub fn build_http_state(config: &AppConfig, pool: DbPool) -> Result<HttpState, String> {
    let catalog = Arc::new(
        PokeApiClient::new(config.catalog_base_url.clone(), config.catalog_timeout)
            .map_err(|error| format!("failed to build catalog client: {error}"))?,
    );
    let entries = Arc::new(DieselCollectionRepository::new(pool.clone()));
    let users = Arc::new(DieselUserRepository::new(pool));
    let hasher = Arc::new(Argon2PasswordHasher);
    let tokens = Arc::new(JwtTokenService::new(&config.jwt_secret, config.token_ttl));

    let identity = Arc::new(IdentityServiceImpl::new(users, hasher, Arc::clone(&tokens)));
    let collection = Arc::new(CollectionService::new(entries, catalog));
    let collection_queries: Arc<dyn CollectionQuery> = collection.clone();
    let collection_commands: Arc<dyn CollectionCommand> = collection;

    Ok(HttpState::new(
        identity,
        collection_queries,
        collection_commands,
        tokens,
    ))
}

/// Build the Actix application serving the REST API and health probes.
pub fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(
            web::scope("/auth")
                .service(identity::register)
                .service(identity::login),
        )
        .service(
            web::scope("/pokemon")
                .service(collection::list_creatures)
                .service(collection::list_favorites)
                .service(collection::list_team)
                .service(collection::toggle_favorite)
                .service(collection::toggle_team),
        );

    let mut app = App::new()
        .app_data(state)
        .app_data(health_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}

/// Run the server until shutdown: pool, migrations, wiring, bind, serve.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let pool = DbPool::new(PoolConfig::new(config.database_url.clone()))
        .await
        .map_err(std::io::Error::other)?;
    run_pending_migrations(config.database_url.clone())
        .await
        .map_err(std::io::Error::other)?;

    let state = web::Data::new(build_http_state(&config, pool).map_err(std::io::Error::other)?);
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness flip stays visible here.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(state.clone(), server_health_state.clone()))
        .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(bind_addr = %config.bind_addr, "server listening");
    server.run().await
}
