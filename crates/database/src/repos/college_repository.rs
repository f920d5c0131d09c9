//! Repository for college data access operations.

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::{college_from_row, timestamp};
use crate::entities::{College, CreateCollegeRequest};
use crate::types::{DatabaseError, DatabaseResult};

const COLLEGE_SELECT: &str = "SELECT id, name, domain, created_at, updated_at FROM colleges";

/// Repository for college database operations
#[derive(Clone)]
pub struct CollegeRepository {
    pool: SqlitePool,
}

impl CollegeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<College>> {
        let row = sqlx::query(&format!("{COLLEGE_SELECT} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| college_from_row(&row, "")).transpose()
    }

    pub async fn list(&self) -> DatabaseResult<Vec<College>> {
        let rows = sqlx::query(&format!("{COLLEGE_SELECT} ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| college_from_row(row, "")).collect()
    }

    /// Create a college. A taken domain yields [`DatabaseError::Duplicate`].
    pub async fn create(&self, request: &CreateCollegeRequest) -> DatabaseResult<College> {
        let id = Uuid::new_v4();
        let now = timestamp();

        sqlx::query(
            "INSERT INTO colleges (id, name, domain, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.domain)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::Duplicate(_) => {
                DatabaseError::Duplicate(format!("college domain {} already exists", request.domain))
            }
            other => other,
        })?;

        info!(college_id = %id, domain = %request.domain, "created college");

        Ok(College {
            id,
            name: request.name.clone(),
            domain: request.domain.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colleges")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
