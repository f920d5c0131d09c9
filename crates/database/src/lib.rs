//! Marketplace Database Crate
//!
//! Connection management, embedded migrations, repositories for every marketplace
//! entity, and the bootstrap seeder.

use marketplace_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod seed;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;
pub use seed::{seed_defaults, SeedReport};

pub use repos::{
    ChatRepository, CollegeRepository, FavoriteRepository, MessageRepository, ProductRepository,
    PurchaseRequestRepository, UserRepository,
};

pub use entities::{
    chat::{Chat, ChatFilter, CreateChatRequest},
    college::{College, CreateCollegeRequest},
    favorite::{Favorite, FavoriteFilter},
    message::{CreateMessageRequest, Message},
    product::{
        CreateProductRequest, Product, ProductFilter, ProductStatus, ProductSummary,
        UpdateProductRequest,
    },
    purchase_request::{
        CreatePurchaseRequest, PurchaseRequest, PurchaseRequestFilter, PurchaseRequestStatus,
    },
    user::{CreateUserRequest, UpdateUserRequest, User, UserFilter, UserSummary},
};

pub use types::{errors::DatabaseError, DatabaseResult};

/// Open the pool and bring the schema up to date
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deleting_product_detaches_chats() {
        let (pool, _temp_dir) = test_support::test_pool().await;
        let college = test_support::seed_college(&pool, "state.edu").await;
        let seller = test_support::seed_user(&pool, college.id, "seller@state.edu").await;
        let product = test_support::seed_product(&pool, seller.id, "Bike").await;
        let chats = ChatRepository::new(pool.clone());
        let chat = chats
            .create(&CreateChatRequest { product_id: Some(product.id), participants: vec![seller.id] })
            .await
            .unwrap();

        ProductRepository::new(pool).delete(product.id).await.unwrap();

        let reloaded = chats.find_by_id(chat.id).await.unwrap().unwrap();
        assert_eq!(reloaded.product_id, None);
    }
}
