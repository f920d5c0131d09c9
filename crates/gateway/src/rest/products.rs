//! Product REST endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use marketplace_database::{Product, ProductFilter, ProductStatus, ProductSummary};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::colleges::CollegeResponse;
use super::users::UserSummaryResponse;
use crate::error::{GatewayError, GatewayResult};
use crate::extract::{ApiJson, ApiQuery, ValidUuid};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub condition: String,
    pub category: String,
    #[schema(value_type = String, example = "available")]
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub seller_id: Uuid,
    pub college_id: Uuid,
    pub seller: UserSummaryResponse,
    pub college: CollegeResponse,
    pub posted_at: String,
    pub updated_at: String,
}

/// The slice of a product embedded in favorites and purchase requests
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    #[schema(value_type = String, example = "available")]
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub seller_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub category: String,
    /// Defaults to `available`
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: ProductStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub seller_id: Uuid,
    /// Defaults to the seller's college
    pub college_id: Option<Uuid>,
}

/// Replaces every mutable field of a product
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub condition: String,
    pub category: String,
    #[schema(value_type = String)]
    pub status: ProductStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    pub college_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub status: Option<ProductStatus>,
    pub category: Option<String>,
}

/// Confirmation returned by delete endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub message: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            description: product.description,
            condition: product.condition,
            category: product.category,
            status: product.status,
            images: product.images,
            tags: product.tags,
            seller_id: product.seller.id,
            college_id: product.college.id,
            seller: product.seller.into(),
            college: product.college.into(),
            posted_at: product.posted_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(product: ProductSummary) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            status: product.status,
            images: product.images,
            seller_id: product.seller_id,
        }
    }
}

pub fn create_product_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Products, newest first", body = Vec<ProductResponse>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<Arc<GatewayState>>,
    ApiQuery(query): ApiQuery<ListProductsQuery>,
) -> GatewayResult<Json<Vec<ProductResponse>>> {
    let products = state
        .products
        .list(&ProductFilter {
            college_id: query.college_id,
            seller_id: query.seller_id,
            status: query.status,
            category: query.category,
        })
        .await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Malformed body or unknown seller/college", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> GatewayResult<(StatusCode, Json<ProductResponse>)> {
    let product = state
        .products
        .create(&marketplace_database::CreateProductRequest {
            title: payload.title,
            price: payload.price,
            description: payload.description,
            condition: payload.condition,
            category: payload.category,
            status: payload.status,
            images: payload.images,
            tags: payload.tags,
            seller_id: payload.seller_id,
            college_id: payload.college_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with seller and college", body = ProductResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_product(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<ProductResponse>> {
    let product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("product {id}")))?;

    Ok(Json(product.into()))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "Malformed id or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_product(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<UpdateProductRequest>,
) -> GatewayResult<Json<ProductResponse>> {
    let product = state
        .products
        .update(
            id,
            &marketplace_database::UpdateProductRequest {
                title: payload.title,
                price: payload.price,
                description: payload.description,
                condition: payload.condition,
                category: payload.category,
                status: payload.status,
                images: payload.images,
                tags: payload.tags,
            },
        )
        .await?;

    Ok(Json(product.into()))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = DeletedResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_product(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<DeletedResponse>> {
    state.products.delete(id).await?;

    Ok(Json(DeletedResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
