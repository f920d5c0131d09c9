//! Repository for product listings.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{college_from_row, timestamp, user_summary_from_row, uuid_column};
use crate::entities::product::{decode_list, encode_list};
use crate::entities::{
    CreateProductRequest, Product, ProductFilter, ProductStatus, UpdateProductRequest,
};
use crate::types::{DatabaseError, DatabaseResult};

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.title, p.price, p.description, p.condition, p.category, p.status,
           p.images, p.tags, p.posted_at, p.updated_at,
           s.id AS seller_id, s.name AS seller_name, s.email AS seller_email, s.avatar AS seller_avatar,
           c.id AS college_id, c.name AS college_name, c.domain AS college_domain,
           c.created_at AS college_created_at, c.updated_at AS college_updated_at
    FROM products p
    JOIN users s ON s.id = p.seller_id
    JOIN colleges c ON c.id = p.college_id
"#;

fn product_from_row(row: &SqliteRow) -> DatabaseResult<Product> {
    let status: String = row.try_get("status")?;
    let images: String = row.try_get("images")?;
    let tags: String = row.try_get("tags")?;

    Ok(Product {
        id: uuid_column(row, "id")?,
        title: row.try_get("title")?,
        price: row.try_get("price")?,
        description: row.try_get("description")?,
        condition: row.try_get("condition")?,
        category: row.try_get("category")?,
        status: ProductStatus::from(status.as_str()),
        images: decode_list(&images)?,
        tags: decode_list(&tags)?,
        seller: user_summary_from_row(row, "seller_")?,
        college: college_from_row(row, "college_")?,
        posted_at: row.try_get("posted_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Repository for product database operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a product with its seller and college
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        let row = sqlx::query(&format!("{PRODUCT_SELECT} WHERE p.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| product_from_row(&row)).transpose()
    }

    pub async fn exists(&self, id: Uuid) -> DatabaseResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// List products, newest first
    pub async fn list(&self, filter: &ProductFilter) -> DatabaseResult<Vec<Product>> {
        let rows = sqlx::query(&format!(
            r#"{PRODUCT_SELECT}
            WHERE (?1 IS NULL OR p.college_id = ?1)
              AND (?2 IS NULL OR p.seller_id = ?2)
              AND (?3 IS NULL OR p.status = ?3)
              AND (?4 IS NULL OR p.category = ?4)
            ORDER BY p.posted_at DESC, p.rowid DESC"#
        ))
        .bind(filter.college_id.map(|id| id.to_string()))
        .bind(filter.seller_id.map(|id| id.to_string()))
        .bind(filter.status.map(|status| status.as_str()))
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Create a product. The college defaults to the seller's college within the same
    /// statement; an unknown seller or college surfaces as [`DatabaseError::InvalidReference`].
    pub async fn create(&self, request: &CreateProductRequest) -> DatabaseResult<Product> {
        let id = Uuid::new_v4();
        let now = timestamp();
        let seller_id = request.seller_id.to_string();

        sqlx::query(
            r#"
            INSERT INTO products (id, title, price, description, condition, category, status,
                                  images, tags, seller_id, college_id, posted_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                    COALESCE(?, (SELECT college_id FROM users WHERE id = ?)),
                    ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.title)
        .bind(request.price)
        .bind(&request.description)
        .bind(&request.condition)
        .bind(&request.category)
        .bind(request.status.as_str())
        .bind(encode_list(&request.images)?)
        .bind(encode_list(&request.tags)?)
        .bind(&seller_id)
        .bind(request.college_id.map(|id| id.to_string()))
        .bind(&seller_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::InvalidReference(_) => DatabaseError::InvalidReference(format!(
                "seller {} or its college does not exist",
                request.seller_id
            )),
            other => other,
        })?;

        info!(
            product_id = %id,
            seller_id = %request.seller_id,
            status = %request.status,
            "created product"
        );

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("product", id))
    }

    /// Overwrite every mutable field of a product
    pub async fn update(&self, id: Uuid, request: &UpdateProductRequest) -> DatabaseResult<Product> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET title = ?, price = ?, description = ?, condition = ?, category = ?,
                status = ?, images = ?, tags = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.title)
        .bind(request.price)
        .bind(&request.description)
        .bind(&request.condition)
        .bind(&request.category)
        .bind(request.status.as_str())
        .bind(encode_list(&request.images)?)
        .bind(encode_list(&request.tags)?)
        .bind(timestamp())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("product", id));
        }

        info!(product_id = %id, status = %request.status, "updated product");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("product", id))
    }

    /// Delete a product together with its favorites and purchase requests
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("product", id));
        }

        info!(product_id = %id, "deleted product");
        Ok(())
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
