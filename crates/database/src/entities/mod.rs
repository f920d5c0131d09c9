//! Domain entities for the database layer
//!
//! Entities carry their eager-loaded relations (a product holds its seller and
//! college, a chat holds its participants) so handlers never issue follow-up
//! lookups.

pub mod college;
pub mod user;
pub mod product;
pub mod chat;
pub mod message;
pub mod purchase_request;
pub mod favorite;

pub use college::{College, CreateCollegeRequest};
pub use user::{User, UserSummary, CreateUserRequest, UpdateUserRequest, UserFilter};
pub use product::{
    Product, ProductSummary, ProductStatus, CreateProductRequest, UpdateProductRequest,
    ProductFilter,
};
pub use chat::{Chat, CreateChatRequest, ChatFilter};
pub use message::{Message, CreateMessageRequest};
pub use purchase_request::{
    PurchaseRequest, PurchaseRequestStatus, CreatePurchaseRequest,
    PurchaseRequestFilter,
};
pub use favorite::{Favorite, FavoriteFilter};
