//! Repository for purchase requests.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{product_summary_from_row, timestamp, user_summary_from_row, uuid_column};
use crate::entities::{
    CreatePurchaseRequest, PurchaseRequest, PurchaseRequestFilter, PurchaseRequestStatus,
};
use crate::types::{DatabaseError, DatabaseResult};

const REQUEST_SELECT: &str = r#"
    SELECT r.id, r.seller_id, r.status, r.created_at, r.updated_at,
           p.id AS product_id, p.title AS product_title, p.price AS product_price,
           p.status AS product_status, p.images AS product_images, p.seller_id AS product_seller_id,
           b.id AS buyer_id, b.name AS buyer_name, b.email AS buyer_email, b.avatar AS buyer_avatar
    FROM purchase_requests r
    JOIN products p ON p.id = r.product_id
    JOIN users b ON b.id = r.buyer_id
"#;

fn purchase_request_from_row(row: &SqliteRow) -> DatabaseResult<PurchaseRequest> {
    let status: String = row.try_get("status")?;

    Ok(PurchaseRequest {
        id: uuid_column(row, "id")?,
        product: product_summary_from_row(row, "product_")?,
        buyer: user_summary_from_row(row, "buyer_")?,
        seller_id: uuid_column(row, "seller_id")?,
        status: PurchaseRequestStatus::from(status.as_str()),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(Clone)]
pub struct PurchaseRequestRepository {
    pool: SqlitePool,
}

impl PurchaseRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<PurchaseRequest>> {
        let row = sqlx::query(&format!("{REQUEST_SELECT} WHERE r.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| purchase_request_from_row(&row)).transpose()
    }

    /// List requests, newest first
    pub async fn list(&self, filter: &PurchaseRequestFilter) -> DatabaseResult<Vec<PurchaseRequest>> {
        let rows = sqlx::query(&format!(
            r#"{REQUEST_SELECT}
            WHERE (?1 IS NULL OR r.buyer_id = ?1)
              AND (?2 IS NULL OR r.seller_id = ?2)
              AND (?3 IS NULL OR r.product_id = ?3)
              AND (?4 IS NULL OR r.status = ?4)
            ORDER BY r.created_at DESC, r.rowid DESC"#
        ))
        .bind(filter.buyer_id.map(|id| id.to_string()))
        .bind(filter.seller_id.map(|id| id.to_string()))
        .bind(filter.product_id.map(|id| id.to_string()))
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(purchase_request_from_row).collect()
    }

    /// Open a pending request. The seller is read from the product in the same statement, so an
    /// unknown product inserts nothing and reports [`DatabaseError::InvalidReference`].
    pub async fn create(&self, request: &CreatePurchaseRequest) -> DatabaseResult<PurchaseRequest> {
        let id = Uuid::new_v4();
        let now = timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO purchase_requests (id, product_id, buyer_id, seller_id, status, created_at, updated_at)
            SELECT ?, p.id, ?, p.seller_id, ?, ?, ?
            FROM products p
            WHERE p.id = ?
            "#,
        )
        .bind(id.to_string())
        .bind(request.buyer_id.to_string())
        .bind(PurchaseRequestStatus::Pending.as_str())
        .bind(&now)
        .bind(&now)
        .bind(request.product_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::InvalidReference(_) => {
                DatabaseError::InvalidReference(format!("buyer {} does not exist", request.buyer_id))
            }
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::InvalidReference(format!(
                "product {} does not exist",
                request.product_id
            )));
        }

        info!(
            request_id = %id,
            product_id = %request.product_id,
            buyer_id = %request.buyer_id,
            "created purchase request"
        );

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("purchase request", id))
    }

    /// Set the status of a request. Transitions are unrestricted.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PurchaseRequestStatus,
    ) -> DatabaseResult<PurchaseRequest> {
        let result = sqlx::query("UPDATE purchase_requests SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(timestamp())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("purchase request", id));
        }

        info!(request_id = %id, %status, "updated purchase request");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("purchase request", id))
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchase_requests")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::ProductRepository;
    use crate::test_support::{seed_college, seed_product, seed_user, test_pool};

    #[tokio::test]
    async fn test_create_copies_seller_from_product() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let seller = seed_user(&pool, college.id, "seller@state.edu").await;
        let buyer = seed_user(&pool, college.id, "buyer@state.edu").await;
        let product = seed_product(&pool, seller.id, "Desk lamp").await;
        let repo = PurchaseRequestRepository::new(pool);

        let request = repo
            .create(&CreatePurchaseRequest { product_id: product.id, buyer_id: buyer.id })
            .await
            .unwrap();

        assert_eq!(request.seller_id, seller.id);
        assert_eq!(request.status, PurchaseRequestStatus::Pending);
        assert_eq!(request.product.id, product.id);
        assert_eq!(request.product.title, "Desk lamp");
        assert_eq!(request.buyer.id, buyer.id);
    }

    #[tokio::test]
    async fn test_create_for_missing_product_is_invalid_reference() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let buyer = seed_user(&pool, college.id, "buyer@state.edu").await;
        let repo = PurchaseRequestRepository::new(pool);

        let error = repo
            .create(&CreatePurchaseRequest { product_id: Uuid::new_v4(), buyer_id: buyer.id })
            .await
            .unwrap_err();

        assert!(matches!(error, DatabaseError::InvalidReference(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_status_updates_and_filters() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let seller = seed_user(&pool, college.id, "seller@state.edu").await;
        let alice = seed_user(&pool, college.id, "alice@state.edu").await;
        let bob = seed_user(&pool, college.id, "bob@state.edu").await;
        let product = seed_product(&pool, seller.id, "Textbook").await;
        let repo = PurchaseRequestRepository::new(pool);

        let from_alice = repo
            .create(&CreatePurchaseRequest { product_id: product.id, buyer_id: alice.id })
            .await
            .unwrap();
        let from_bob = repo
            .create(&CreatePurchaseRequest { product_id: product.id, buyer_id: bob.id })
            .await
            .unwrap();

        let accepted = repo
            .update_status(from_alice.id, PurchaseRequestStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, PurchaseRequestStatus::Accepted);

        let reverted = repo
            .update_status(from_alice.id, PurchaseRequestStatus::Pending)
            .await
            .unwrap();
        assert_eq!(reverted.status, PurchaseRequestStatus::Pending);
        repo.update_status(from_alice.id, PurchaseRequestStatus::Accepted)
            .await
            .unwrap();

        let for_seller = repo
            .list(&PurchaseRequestFilter { seller_id: Some(seller.id), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(for_seller.len(), 2);
        assert_eq!(for_seller[0].id, from_bob.id);

        let pending = repo
            .list(&PurchaseRequestFilter {
                status: Some(PurchaseRequestStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].buyer.id, bob.id);

        let error = repo
            .update_status(Uuid::new_v4(), PurchaseRequestStatus::Declined)
            .await
            .unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_requests_are_removed_with_their_product() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let seller = seed_user(&pool, college.id, "seller@state.edu").await;
        let buyer = seed_user(&pool, college.id, "buyer@state.edu").await;
        let product = seed_product(&pool, seller.id, "Chair").await;
        let repo = PurchaseRequestRepository::new(pool.clone());

        repo.create(&CreatePurchaseRequest { product_id: product.id, buyer_id: buyer.id })
            .await
            .unwrap();
        ProductRepository::new(pool).delete(product.id).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
