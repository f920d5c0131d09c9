//! Shared application state for the gateway

use marketplace_database::{
    ChatRepository, CollegeRepository, DatabaseConnection, FavoriteRepository, MessageRepository,
    ProductRepository, PurchaseRequestRepository, UserRepository,
};
use sqlx::SqlitePool;

/// Repositories shared by every handler
#[derive(Clone)]
pub struct GatewayState {
    pub database: DatabaseConnection,
    pub colleges: CollegeRepository,
    pub users: UserRepository,
    pub products: ProductRepository,
    pub chats: ChatRepository,
    pub messages: MessageRepository,
    pub requests: PurchaseRequestRepository,
    pub favorites: FavoriteRepository,
}

impl GatewayState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            colleges: CollegeRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            chats: ChatRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            requests: PurchaseRequestRepository::new(pool.clone()),
            favorites: FavoriteRepository::new(pool.clone()),
            database: DatabaseConnection::from_pool(pool),
        }
    }
}
