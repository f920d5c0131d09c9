//! User REST endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use marketplace_database::{User, UserFilter, UserSummary};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::colleges::CollegeResponse;
use crate::error::{GatewayError, GatewayResult};
use crate::extract::{ApiJson, ApiQuery, ValidUuid};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
    pub college_id: Uuid,
    pub college: CollegeResponse,
    pub created_at: String,
    pub updated_at: String,
}

/// The public slice of a user embedded in other resources
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
    /// Defaults to the oldest registered college
    pub college_id: Option<Uuid>,
}

/// Replaces every mutable field; omitted optional fields are cleared
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    pub college_id: Option<Uuid>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            year: user.year,
            department: user.department,
            college_id: user.college.id,
            college: user.college.into(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
        }
    }
}

pub fn create_user_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users", body = Vec<UserResponse>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<Arc<GatewayState>>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> GatewayResult<Json<Vec<UserResponse>>> {
    let users = state
        .users
        .list(&UserFilter {
            college_id: query.college_id,
        })
        .await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Malformed body or unknown college", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> GatewayResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .users
        .create(&marketplace_database::CreateUserRequest {
            name: payload.name,
            email: payload.email,
            avatar: payload.avatar,
            year: payload.year,
            department: payload.department,
            college_id: payload.college_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User with college", body = UserResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("user {id}")))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Malformed id or body", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> GatewayResult<Json<UserResponse>> {
    let user = state
        .users
        .update(
            id,
            &marketplace_database::UpdateUserRequest {
                name: payload.name,
                email: payload.email,
                avatar: payload.avatar,
                year: payload.year,
                department: payload.department,
            },
        )
        .await?;

    Ok(Json(user.into()))
}
