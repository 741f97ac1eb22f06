//! Collection API handlers.
//!
//! ```text
//! GET  /api/v1/pokemon/?limit=20&offset=0&name=bulba
//! POST /api/v1/pokemon/{code}/favorite
//! POST /api/v1/pokemon/{code}/team
//! GET  /api/v1/pokemon/favorites
//! GET  /api/v1/pokemon/team
//! ```
//!
//! The toggle endpoints accept optional creature data in the body. A
//! malformed or non-object body is treated as "no data supplied" and the
//! service falls back to a catalog fetch; it is never a parse error.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ListingPage;
use crate::domain::{CollectionEntryView, CreatureListing, Error, SuppliedCreatureData};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Query parameters for the enriched listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCreaturesQuery {
    /// Page size; defaults to 20.
    pub limit: Option<u32>,
    /// Page start; defaults to 0.
    pub offset: Option<u32>,
    /// Case-insensitive substring filter on the catalog name.
    pub name: Option<String>,
}

/// Enriched listing response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCreaturesResponse {
    pub data: Vec<CreatureListing>,
    /// Number of items in `data` after filtering.
    pub returned: usize,
}

/// Favorite toggle response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteResponse {
    pub code: String,
    pub is_favorite: bool,
}

/// Team toggle response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleTeamResponse {
    pub code: String,
    pub in_team: bool,
}

/// Stored favorites response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub data: Vec<CollectionEntryView>,
}

/// Stored team response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub data: Vec<CollectionEntryView>,
    pub count: usize,
}

/// Decode optional creature data from a toggle request body.
///
/// Anything that is not a complete, well-formed object is `None`.
fn parse_supplied_data(body: &[u8]) -> Option<SuppliedCreatureData> {
    serde_json::from_slice(body).ok()
}

/// List one catalog page merged with the caller's stored flags.
#[utoipa::path(
    get,
    path = "/api/v1/pokemon/",
    params(ListCreaturesQuery),
    responses(
        (status = 200, description = "Enriched creature listing", body = ListCreaturesResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pokemon"],
    operation_id = "listCreatures"
)]
#[get("/")]
pub async fn list_creatures(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<ListCreaturesQuery>,
) -> ApiResult<web::Json<ListCreaturesResponse>> {
    let query = query.into_inner();
    let page = ListingPage {
        limit: query.limit.unwrap_or(20),
        offset: query.offset.unwrap_or(0),
    };
    let data = state
        .collection_queries
        .list_for_user(user.user_id(), page, query.name)
        .await?;
    let returned = data.len();
    Ok(web::Json(ListCreaturesResponse { data, returned }))
}

/// Toggle the favorite flag for one creature.
#[utoipa::path(
    post,
    path = "/api/v1/pokemon/{code}/favorite",
    params(("code" = String, Path, description = "Catalog code (name or numeric id)")),
    request_body(content = SuppliedCreatureData, description = "Optional creature data", content_type = "application/json"),
    responses(
        (status = 200, description = "New favorite state", body = ToggleFavoriteResponse),
        (status = 400, description = "Creature data could not be resolved", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pokemon"],
    operation_id = "toggleFavorite"
)]
#[post("/{code}/favorite")]
pub async fn toggle_favorite(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<ToggleFavoriteResponse>> {
    let code = path.into_inner();
    let supplied = parse_supplied_data(&body);
    let is_favorite = state
        .collection_commands
        .toggle_favorite(user.user_id(), &code, supplied)
        .await?;
    Ok(web::Json(ToggleFavoriteResponse { code, is_favorite }))
}

/// Toggle battle-team membership for one creature (team capacity 6).
#[utoipa::path(
    post,
    path = "/api/v1/pokemon/{code}/team",
    params(("code" = String, Path, description = "Catalog code (name or numeric id)")),
    request_body(content = SuppliedCreatureData, description = "Optional creature data", content_type = "application/json"),
    responses(
        (status = 200, description = "New team membership", body = ToggleTeamResponse),
        (status = 400, description = "Team is full or creature data could not be resolved", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pokemon"],
    operation_id = "toggleTeam"
)]
#[post("/{code}/team")]
pub async fn toggle_team(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<ToggleTeamResponse>> {
    let code = path.into_inner();
    let supplied = parse_supplied_data(&body);
    let in_team = state
        .collection_commands
        .toggle_team(user.user_id(), &code, supplied)
        .await?;
    Ok(web::Json(ToggleTeamResponse { code, in_team }))
}

/// List the caller's stored favorites.
#[utoipa::path(
    get,
    path = "/api/v1/pokemon/favorites",
    responses(
        (status = 200, description = "Stored favorites", body = FavoritesResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pokemon"],
    operation_id = "listFavorites"
)]
#[get("/favorites")]
pub async fn list_favorites(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<FavoritesResponse>> {
    let data = state.collection_queries.favorites(user.user_id()).await?;
    Ok(web::Json(FavoritesResponse { data }))
}

/// List the caller's battle team.
#[utoipa::path(
    get,
    path = "/api/v1/pokemon/team",
    responses(
        (status = 200, description = "Battle team", body = TeamResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pokemon"],
    operation_id = "listTeam"
)]
#[get("/team")]
pub async fn list_team(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<TeamResponse>> {
    let data = state.collection_queries.team(user.user_id()).await?;
    let count = data.len();
    Ok(web::Json(TeamResponse { data, count }))
}
