//! Database repository implementations

pub mod chat_repository;
pub mod college_repository;
pub mod favorite_repository;
pub mod message_repository;
pub mod product_repository;
pub mod purchase_request_repository;
pub mod user_repository;

pub use chat_repository::*;
pub use college_repository::*;
pub use favorite_repository::*;
pub use message_repository::*;
pub use product_repository::*;
pub use purchase_request_repository::*;
pub use user_repository::*;

use chrono::{SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::entities::{
    product::decode_list, College, ProductStatus, ProductSummary, UserSummary,
};
use crate::types::DatabaseResult;

/// Fixed-width UTC timestamp so stored values sort lexicographically.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn uuid_column(row: &SqliteRow, column: &str) -> DatabaseResult<Uuid> {
    let raw: String = row.try_get(column)?;
    Ok(Uuid::parse_str(&raw)?)
}

pub(crate) fn optional_uuid_column(row: &SqliteRow, column: &str) -> DatabaseResult<Option<Uuid>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| Uuid::parse_str(&value))
        .transpose()
        .map_err(Into::into)
}

/// Read a college from columns named `{prefix}id`, `{prefix}name`, ...
pub(crate) fn college_from_row(row: &SqliteRow, prefix: &str) -> DatabaseResult<College> {
    Ok(College {
        id: uuid_column(row, &format!("{prefix}id"))?,
        name: row.try_get(format!("{prefix}name").as_str())?,
        domain: row.try_get(format!("{prefix}domain").as_str())?,
        created_at: row.try_get(format!("{prefix}created_at").as_str())?,
        updated_at: row.try_get(format!("{prefix}updated_at").as_str())?,
    })
}

pub(crate) fn user_summary_from_row(row: &SqliteRow, prefix: &str) -> DatabaseResult<UserSummary> {
    Ok(UserSummary {
        id: uuid_column(row, &format!("{prefix}id"))?,
        name: row.try_get(format!("{prefix}name").as_str())?,
        email: row.try_get(format!("{prefix}email").as_str())?,
        avatar: row.try_get(format!("{prefix}avatar").as_str())?,
    })
}

pub(crate) fn product_summary_from_row(
    row: &SqliteRow,
    prefix: &str,
) -> DatabaseResult<ProductSummary> {
    let status: String = row.try_get(format!("{prefix}status").as_str())?;
    let images: String = row.try_get(format!("{prefix}images").as_str())?;

    Ok(ProductSummary {
        id: uuid_column(row, &format!("{prefix}id"))?,
        title: row.try_get(format!("{prefix}title").as_str())?,
        price: row.try_get(format!("{prefix}price").as_str())?,
        status: ProductStatus::from(status.as_str()),
        images: decode_list(&images)?,
        seller_id: uuid_column(row, &format!("{prefix}seller_id"))?,
    })
}
