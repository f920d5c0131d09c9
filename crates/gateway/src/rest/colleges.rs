//! College REST endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use marketplace_database::College;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::extract::{ApiJson, ValidUuid};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CollegeResponse {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCollegeRequest {
    pub name: String,
    pub domain: String,
}

impl From<College> for CollegeResponse {
    fn from(college: College) -> Self {
        Self {
            id: college.id,
            name: college.name,
            domain: college.domain,
            created_at: college.created_at,
            updated_at: college.updated_at,
        }
    }
}

pub fn create_college_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/colleges", get(list_colleges).post(create_college))
        .route("/colleges/:id", get(get_college))
}

#[utoipa::path(
    get,
    path = "/api/colleges",
    tag = "Colleges",
    responses(
        (status = 200, description = "All colleges by name", body = Vec<CollegeResponse>),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_colleges(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<CollegeResponse>>> {
    let colleges = state.colleges.list().await?;
    Ok(Json(colleges.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/colleges",
    tag = "Colleges",
    request_body = CreateCollegeRequest,
    responses(
        (status = 201, description = "College created", body = CollegeResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 409, description = "Domain already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_college(
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<CreateCollegeRequest>,
) -> GatewayResult<(StatusCode, Json<CollegeResponse>)> {
    let college = state
        .colleges
        .create(&marketplace_database::CreateCollegeRequest {
            name: payload.name,
            domain: payload.domain,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(college.into())))
}

#[utoipa::path(
    get,
    path = "/api/colleges/{id}",
    tag = "Colleges",
    params(("id" = Uuid, Path, description = "College id")),
    responses(
        (status = 200, description = "College", body = CollegeResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "College not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_college(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<CollegeResponse>> {
    let college = state
        .colleges
        .find_by_id(id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("college {id}")))?;

    Ok(Json(college.into()))
}
