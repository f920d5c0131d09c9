//! Favorite REST endpoints. `:id` is the favorited product.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use marketplace_database::{DatabaseError, Favorite, FavoriteFilter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::products::{DeletedResponse, ProductSummaryResponse};
use crate::error::{GatewayError, GatewayResult};
use crate::extract::{ApiJson, ApiQuery, ValidUuid};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product: ProductSummaryResponse,
    pub created_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFavoritesQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemoveFavoriteQuery {
    pub user_id: Uuid,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            product_id: favorite.product.id,
            product: favorite.product.into(),
            created_at: favorite.created_at,
        }
    }
}

pub fn create_favorite_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/:id", post(add_favorite).delete(remove_favorite))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "Favorites",
    params(ListFavoritesQuery),
    responses(
        (status = 200, description = "Favorites, most recent first", body = Vec<FavoriteResponse>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_favorites(
    State(state): State<Arc<GatewayState>>,
    ApiQuery(query): ApiQuery<ListFavoritesQuery>,
) -> GatewayResult<Json<Vec<FavoriteResponse>>> {
    let favorites = state
        .favorites
        .list(&FavoriteFilter {
            user_id: query.user_id,
        })
        .await?;

    Ok(Json(favorites.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/favorites/{id}",
    tag = "Favorites",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Favorite recorded; repeats return the existing favorite", body = FavoriteResponse),
        (status = 400, description = "Malformed id, body or unknown user", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_favorite(
    ValidUuid(product_id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<AddFavoriteRequest>,
) -> GatewayResult<(StatusCode, Json<FavoriteResponse>)> {
    let favorite = match state.favorites.add(payload.user_id, product_id).await {
        Ok(favorite) => favorite,
        // A missing path product is a 404; only an unknown user is a body error.
        Err(DatabaseError::InvalidReference(_)) => {
            if !state.products.exists(product_id).await? {
                return Err(GatewayError::NotFound(format!("product {product_id}")));
            }
            return Err(GatewayError::InvalidRequest(format!(
                "user {} does not exist",
                payload.user_id
            )));
        }
        Err(other) => return Err(other.into()),
    };

    Ok((StatusCode::CREATED, Json(favorite.into())))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{id}",
    tag = "Favorites",
    params(
        ("id" = Uuid, Path, description = "Product id"),
        RemoveFavoriteQuery
    ),
    responses(
        (status = 200, description = "Favorite removed", body = DeletedResponse),
        (status = 400, description = "Malformed id or missing user_id", body = crate::error::ErrorResponse),
        (status = 404, description = "No such favorite", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_favorite(
    ValidUuid(product_id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
    ApiQuery(query): ApiQuery<RemoveFavoriteQuery>,
) -> GatewayResult<Json<DeletedResponse>> {
    state.favorites.remove(query.user_id, product_id).await?;

    Ok(Json(DeletedResponse {
        message: "Favorite removed successfully".to_string(),
    }))
}
