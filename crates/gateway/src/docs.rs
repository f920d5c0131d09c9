//! OpenAPI document for the REST surface

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::rest;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::health::health_check,
        rest::products::list_products,
        rest::products::create_product,
        rest::products::get_product,
        rest::products::update_product,
        rest::products::delete_product,
        rest::users::list_users,
        rest::users::create_user,
        rest::users::get_user,
        rest::users::update_user,
        rest::colleges::list_colleges,
        rest::colleges::create_college,
        rest::colleges::get_college,
        rest::chats::list_chats,
        rest::chats::create_chat,
        rest::chats::get_chat,
        rest::chats::list_messages,
        rest::chats::create_message,
        rest::requests::list_requests,
        rest::requests::create_request,
        rest::requests::update_request,
        rest::favorites::list_favorites,
        rest::favorites::add_favorite,
        rest::favorites::remove_favorite,
    ),
    components(
        schemas(
            ErrorResponse,
            rest::health::HealthResponse,
            rest::products::ProductResponse,
            rest::products::ProductSummaryResponse,
            rest::products::CreateProductRequest,
            rest::products::UpdateProductRequest,
            rest::products::DeletedResponse,
            rest::users::UserResponse,
            rest::users::UserSummaryResponse,
            rest::users::CreateUserRequest,
            rest::users::UpdateUserRequest,
            rest::colleges::CollegeResponse,
            rest::colleges::CreateCollegeRequest,
            rest::chats::ChatResponse,
            rest::chats::ChatDetailResponse,
            rest::chats::MessageResponse,
            rest::chats::CreateChatRequest,
            rest::chats::CreateMessageRequest,
            rest::requests::PurchaseRequestResponse,
            rest::requests::CreatePurchaseRequest,
            rest::requests::UpdatePurchaseRequest,
            rest::favorites::FavoriteResponse,
            rest::favorites::AddFavoriteRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Products", description = "Marketplace listings"),
        (name = "Users", description = "Students buying and selling"),
        (name = "Colleges", description = "Campuses users and listings belong to"),
        (name = "Chats", description = "Conversations and their messages"),
        (name = "Purchase requests", description = "Offers from buyers to sellers"),
        (name = "Favorites", description = "Saved listings"),
    )
)]
pub struct ApiDoc;
