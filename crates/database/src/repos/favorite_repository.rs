//! Repository for user favorites.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{product_summary_from_row, timestamp, uuid_column};
use crate::entities::{Favorite, FavoriteFilter};
use crate::types::{DatabaseError, DatabaseResult};

const FAVORITE_SELECT: &str = r#"
    SELECT f.id, f.user_id, f.created_at,
           p.id AS product_id, p.title AS product_title, p.price AS product_price,
           p.status AS product_status, p.images AS product_images, p.seller_id AS product_seller_id
    FROM favorites f
    JOIN products p ON p.id = f.product_id
"#;

fn favorite_from_row(row: &SqliteRow) -> DatabaseResult<Favorite> {
    Ok(Favorite {
        id: uuid_column(row, "id")?,
        user_id: uuid_column(row, "user_id")?,
        product: product_summary_from_row(row, "product_")?,
        created_at: row.try_get("created_at")?,
    })
}

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: SqlitePool,
}

impl FavoriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<Option<Favorite>> {
        let row = sqlx::query(&format!("{FAVORITE_SELECT} WHERE f.user_id = ? AND f.product_id = ?"))
            .bind(user_id.to_string())
            .bind(product_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| favorite_from_row(&row)).transpose()
    }

    /// List favorites, most recently added first
    pub async fn list(&self, filter: &FavoriteFilter) -> DatabaseResult<Vec<Favorite>> {
        let rows = sqlx::query(&format!(
            r#"{FAVORITE_SELECT}
            WHERE (?1 IS NULL OR f.user_id = ?1)
            ORDER BY f.created_at DESC, f.rowid DESC"#
        ))
        .bind(filter.user_id.map(|id| id.to_string()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(favorite_from_row).collect()
    }

    /// Mark a product as a favorite. Adding an existing pair returns the stored favorite.
    pub async fn add(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<Favorite> {
        let id = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO favorites (id, user_id, product_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, product_id) DO NOTHING
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(product_id.to_string())
        .bind(timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::InvalidReference(_) => DatabaseError::InvalidReference(format!(
                "user {user_id} or product {product_id} does not exist"
            )),
            other => other,
        })?;

        if result.rows_affected() > 0 {
            info!(%user_id, %product_id, "added favorite");
        }

        self.find(user_id, product_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("favorite", product_id))
    }

    pub async fn remove(&self, user_id: Uuid, product_id: Uuid) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND product_id = ?")
            .bind(user_id.to_string())
            .bind(product_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "favorite of product {product_id} for user {user_id}"
            )));
        }

        info!(%user_id, %product_id, "removed favorite");
        Ok(())
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
