//! Favorite entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProductSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product: ProductSummary,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct FavoriteFilter {
    pub user_id: Option<Uuid>,
}
