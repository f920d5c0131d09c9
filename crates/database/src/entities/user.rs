//! User entity definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::College;

/// User entity with its college eager-loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
    pub college: College,
    pub created_at: String,
    pub updated_at: String,
}

/// The slice of a user embedded in other entities (sellers, senders, participants)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Request for creating a new user
///
/// When `college_id` is absent the user joins the oldest college, which is the
/// seeded default college on a fresh install.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
    pub college_id: Option<Uuid>,
}

/// Full overwrite of a user's mutable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub college_id: Option<Uuid>,
}
