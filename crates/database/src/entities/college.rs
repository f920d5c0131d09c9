//! College entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct College {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCollegeRequest {
    pub name: String,
    pub domain: String,
}
