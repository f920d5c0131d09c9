//! REST API endpoints for the gateway

pub mod chats;
pub mod colleges;
pub mod favorites;
pub mod health;
pub mod products;
pub mod requests;
pub mod users;

use std::sync::Arc;

use axum::Router;

use crate::state::GatewayState;

/// Every `/api` route, relative to the `/api` prefix
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(products::create_product_routes())
        .merge(users::create_user_routes())
        .merge(colleges::create_college_routes())
        .merge(chats::create_chat_routes())
        .merge(requests::create_request_routes())
        .merge(favorites::create_favorite_routes())
}
