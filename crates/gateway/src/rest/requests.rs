//! Purchase request REST endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::{get, put}, Json, Router};
use marketplace_database::{PurchaseRequest, PurchaseRequestFilter, PurchaseRequestStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::products::ProductSummaryResponse;
use super::users::UserSummaryResponse;
use crate::error::GatewayResult;
use crate::extract::{ApiJson, ApiQuery, ValidUuid};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseRequestResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    #[schema(value_type = String, example = "pending")]
    pub status: PurchaseRequestStatus,
    pub product: ProductSummaryResponse,
    pub buyer: UserSummaryResponse,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePurchaseRequest {
    pub product_id: Uuid,
    pub buyer_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePurchaseRequest {
    #[schema(value_type = String, example = "accepted")]
    pub status: PurchaseRequestStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRequestsQuery {
    pub buyer_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub status: Option<PurchaseRequestStatus>,
}

impl From<PurchaseRequest> for PurchaseRequestResponse {
    fn from(request: PurchaseRequest) -> Self {
        Self {
            id: request.id,
            product_id: request.product.id,
            buyer_id: request.buyer.id,
            seller_id: request.seller_id,
            status: request.status,
            product: request.product.into(),
            buyer: request.buyer.into(),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

pub fn create_request_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/:id", put(update_request))
}

#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "Purchase requests",
    params(ListRequestsQuery),
    responses(
        (status = 200, description = "Purchase requests, newest first", body = Vec<PurchaseRequestResponse>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_requests(
    State(state): State<Arc<GatewayState>>,
    ApiQuery(query): ApiQuery<ListRequestsQuery>,
) -> GatewayResult<Json<Vec<PurchaseRequestResponse>>> {
    let requests = state
        .requests
        .list(&PurchaseRequestFilter {
            buyer_id: query.buyer_id,
            seller_id: query.seller_id,
            product_id: query.product_id,
            status: query.status,
        })
        .await?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/requests",
    tag = "Purchase requests",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Pending request opened with the product's seller", body = PurchaseRequestResponse),
        (status = 400, description = "Malformed body or unknown product/buyer", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<CreatePurchaseRequest>,
) -> GatewayResult<(StatusCode, Json<PurchaseRequestResponse>)> {
    let request = state
        .requests
        .create(&marketplace_database::CreatePurchaseRequest {
            product_id: payload.product_id,
            buyer_id: payload.buyer_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}",
    tag = "Purchase requests",
    params(("id" = Uuid, Path, description = "Purchase request id")),
    request_body = UpdatePurchaseRequest,
    responses(
        (status = 200, description = "Updated request", body = PurchaseRequestResponse),
        (status = 400, description = "Malformed id or unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<UpdatePurchaseRequest>,
) -> GatewayResult<Json<PurchaseRequestResponse>> {
    let request = state.requests.update_status(id, payload.status).await?;
    Ok(Json(request.into()))
}
