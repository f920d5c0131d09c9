//! Product entity definitions

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{College, UserSummary};
use crate::types::DatabaseResult;

/// Product entity with seller and college eager-loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub condition: String,
    pub category: String,
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub seller: UserSummary,
    pub college: College,
    pub posted_at: String,
    pub updated_at: String,
}

/// The slice of a product embedded in favorites and purchase requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub seller_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub condition: String,
    pub category: String,
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub seller_id: Uuid,
    /// Falls back to the seller's college
    pub college_id: Option<Uuid>,
}

/// Full overwrite of a product's mutable fields. Seller and college are fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub condition: String,
    pub category: String,
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub college_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub status: Option<ProductStatus>,
    pub category: Option<String>,
}

/// Listing status. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
    Pending,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::Sold => "sold",
            ProductStatus::Pending => "pending",
        }
    }
}

impl From<&str> for ProductStatus {
    fn from(s: &str) -> Self {
        match s {
            "sold" => ProductStatus::Sold,
            "pending" => ProductStatus::Pending,
            _ => ProductStatus::Available,
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a string list for a TEXT column.
pub(crate) fn encode_list(values: &[String]) -> DatabaseResult<String> {
    Ok(serde_json::to_string(values)?)
}

/// Decode a TEXT column written by [`encode_list`]. Empty columns decode to an empty list.
pub(crate) fn decode_list(raw: &str) -> DatabaseResult<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_encoding_preserves_order_and_special_characters() {
        let values = vec![
            "https://cdn.example.edu/a.png?size=large&v=2".to_string(),
            "tag with \"quotes\", commas".to_string(),
            "ünïcödé".to_string(),
        ];

        let encoded = encode_list(&values).unwrap();
        assert_eq!(decode_list(&encoded).unwrap(), values);
    }

    #[test]
    fn empty_column_decodes_to_empty_list() {
        assert!(decode_list("").unwrap().is_empty());
        assert!(decode_list("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_column_is_a_serialization_error() {
        let error = decode_list("not json").unwrap_err();
        assert!(matches!(error, crate::types::DatabaseError::Serialization(_)));
    }

    #[test]
    fn status_round_trips_through_storage_text() {
        for status in [ProductStatus::Available, ProductStatus::Sold, ProductStatus::Pending] {
            assert_eq!(ProductStatus::from(status.as_str()), status);
        }
    }

    #[test]
    fn status_rejects_unknown_json_values() {
        assert!(serde_json::from_str::<ProductStatus>("\"reserved\"").is_err());
        assert_eq!(
            serde_json::from_str::<ProductStatus>("\"sold\"").unwrap(),
            ProductStatus::Sold
        );
    }
}
