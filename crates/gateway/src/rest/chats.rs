//! Chat and message REST endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use marketplace_database::{Chat, ChatFilter, Message};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::users::UserSummaryResponse;
use crate::error::{GatewayError, GatewayResult};
use crate::extract::{ApiJson, ApiQuery, ValidUuid};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub participants: Vec<UserSummaryResponse>,
    pub created_at: String,
    pub updated_at: String,
}

/// A chat together with its full message history
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatDetailResponse {
    #[serde(flatten)]
    pub chat: ChatResponse,
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub sender: UserSummaryResponse,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChatRequest {
    pub product_id: Option<Uuid>,
    /// At least one user; repeated ids are collapsed
    pub participants: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMessageRequest {
    #[serde(alias = "from_id")]
    pub sender_id: Uuid,
    pub text: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListChatsQuery {
    /// Only chats this user participates in
    pub user_id: Option<Uuid>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            product_id: chat.product_id,
            participants: chat.participants.into_iter().map(Into::into).collect(),
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender.id,
            sender: message.sender.into(),
            text: message.text,
            created_at: message.created_at,
        }
    }
}

pub fn create_chat_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/chats", get(list_chats).post(create_chat))
        .route("/chats/:id", get(get_chat))
        .route("/chats/:id/messages", get(list_messages).post(create_message))
}

#[utoipa::path(
    get,
    path = "/api/chats",
    tag = "Chats",
    params(ListChatsQuery),
    responses(
        (status = 200, description = "Chats with participants, most recent activity first", body = Vec<ChatResponse>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_chats(
    State(state): State<Arc<GatewayState>>,
    ApiQuery(query): ApiQuery<ListChatsQuery>,
) -> GatewayResult<Json<Vec<ChatResponse>>> {
    let chats = state
        .chats
        .list(&ChatFilter {
            user_id: query.user_id,
        })
        .await?;

    Ok(Json(chats.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/chats",
    tag = "Chats",
    request_body = CreateChatRequest,
    responses(
        (status = 201, description = "Chat created", body = ChatResponse),
        (status = 400, description = "No participants, malformed body or unknown user/product", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_chat(
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<CreateChatRequest>,
) -> GatewayResult<(StatusCode, Json<ChatResponse>)> {
    if payload.participants.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "a chat needs at least one participant".to_string(),
        ));
    }

    let chat = state
        .chats
        .create(&marketplace_database::CreateChatRequest {
            product_id: payload.product_id,
            participants: payload.participants,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(chat.into())))
}

#[utoipa::path(
    get,
    path = "/api/chats/{id}",
    tag = "Chats",
    params(("id" = Uuid, Path, description = "Chat id")),
    responses(
        (status = 200, description = "Chat with participants and messages", body = ChatDetailResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_chat(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<ChatDetailResponse>> {
    let chat = state
        .chats
        .find_by_id(id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("chat {id}")))?;

    let messages = state.messages.list_for_chat(id).await?;

    Ok(Json(ChatDetailResponse {
        chat: chat.into(),
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/chats/{id}/messages",
    tag = "Chats",
    params(("id" = Uuid, Path, description = "Chat id")),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<MessageResponse>),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_messages(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<MessageResponse>>> {
    if !state.chats.exists(id).await? {
        return Err(GatewayError::NotFound(format!("chat {id}")));
    }

    let messages = state.messages.list_for_chat(id).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/chats/{id}/messages",
    tag = "Chats",
    params(("id" = Uuid, Path, description = "Chat id")),
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Malformed id, body or unknown sender", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_message(
    ValidUuid(id): ValidUuid,
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<CreateMessageRequest>,
) -> GatewayResult<(StatusCode, Json<MessageResponse>)> {
    let message = state
        .messages
        .create(
            id,
            &marketplace_database::CreateMessageRequest {
                sender_id: payload.sender_id,
                text: payload.text,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}
