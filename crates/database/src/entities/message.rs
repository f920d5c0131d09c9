//! Message entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender: UserSummary,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub sender_id: Uuid,
    pub text: String,
}
