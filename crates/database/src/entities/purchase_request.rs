//! Purchase request entity definitions

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ProductSummary, UserSummary};

/// A buyer's request to purchase a product, with product and buyer eager-loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: Uuid,
    pub product: ProductSummary,
    pub buyer: UserSummary,
    pub seller_id: Uuid,
    pub status: PurchaseRequestStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// The seller is copied from the product, never supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePurchaseRequest {
    pub product_id: Uuid,
    pub buyer_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseRequestFilter {
    pub buyer_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub status: Option<PurchaseRequestStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseRequestStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl PurchaseRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseRequestStatus::Pending => "pending",
            PurchaseRequestStatus::Accepted => "accepted",
            PurchaseRequestStatus::Declined => "declined",
        }
    }
}

impl From<&str> for PurchaseRequestStatus {
    fn from(s: &str) -> Self {
        match s {
            "accepted" => PurchaseRequestStatus::Accepted,
            "declined" => PurchaseRequestStatus::Declined,
            _ => PurchaseRequestStatus::Pending,
        }
    }
}

impl fmt::Display for PurchaseRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
