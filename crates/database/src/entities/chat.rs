//! Chat entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserSummary;

/// Chat with its participants eager-loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub participants: Vec<UserSummary>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub product_id: Option<Uuid>,
    pub participants: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatFilter {
    /// Only chats this user participates in
    pub user_id: Option<Uuid>,
}
