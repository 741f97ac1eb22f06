//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API: the
//! auth, pokemon, and health endpoints, the response/request schemas, and
//! the bearer token security scheme. Swagger UI serves the document in
//! debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{CollectionEntryView, CreatureListing, Error, ErrorCode, SuppliedCreatureData};
use crate::inbound::http::collection::{
    FavoritesResponse, ListCreaturesResponse, TeamResponse, ToggleFavoriteResponse,
    ToggleTeamResponse,
};
use crate::inbound::http::identity::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pokédex collection backend API",
        description = "Favorites and battle-team curation over an external creature catalog."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::identity::register,
        crate::inbound::http::identity::login,
        crate::inbound::http::collection::list_creatures,
        crate::inbound::http::collection::toggle_favorite,
        crate::inbound::http::collection::toggle_team,
        crate::inbound::http::collection::list_favorites,
        crate::inbound::http::collection::list_team,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CreatureListing,
        CollectionEntryView,
        SuppliedCreatureData,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        ListCreaturesResponse,
        ToggleFavoriteResponse,
        ToggleTeamResponse,
        FavoritesResponse,
        TeamResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "pokemon", description = "Collection listing and toggles"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_contains_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/pokemon/",
            "/api/v1/pokemon/{code}/favorite",
            "/api/v1/pokemon/{code}/team",
            "/api/v1/pokemon/favorites",
            "/api/v1/pokemon/team",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                paths.iter().any(|path| *path == expected),
                "missing path {expected} in {paths:?}"
            );
        }
    }

    #[test]
    fn document_serializes_to_json() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("openapi serializes");
        assert!(json.contains("BearerToken"));
    }
}
