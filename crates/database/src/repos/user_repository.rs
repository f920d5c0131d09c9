//! User repository for database operations.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{college_from_row, timestamp, uuid_column};
use crate::entities::{CreateUserRequest, UpdateUserRequest, User, UserFilter};
use crate::types::{DatabaseError, DatabaseResult};

const USER_SELECT: &str = r#"
    SELECT u.id, u.name, u.email, u.avatar, u.year, u.department, u.created_at, u.updated_at,
           c.id AS college_id, c.name AS college_name, c.domain AS college_domain,
           c.created_at AS college_created_at, c.updated_at AS college_updated_at
    FROM users u
    JOIN colleges c ON c.id = u.college_id
"#;

fn user_from_row(row: &SqliteRow) -> DatabaseResult<User> {
    Ok(User {
        id: uuid_column(row, "id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        avatar: row.try_get("avatar")?,
        year: row.try_get("year")?,
        department: row.try_get("department")?,
        college: college_from_row(row, "college_")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by ID, with the college eager-loaded
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE u.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| user_from_row(&row)).transpose()
    }

    /// Find the first user registered with an email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!(
            "{USER_SELECT} WHERE u.email = ? ORDER BY u.created_at ASC LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| user_from_row(&row)).transpose()
    }

    pub async fn list(&self, filter: &UserFilter) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "{USER_SELECT} WHERE (?1 IS NULL OR u.college_id = ?1) ORDER BY u.created_at ASC, u.rowid ASC"
        ))
        .bind(filter.college_id.map(|id| id.to_string()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    /// Create a user. Without an explicit college the user joins the default (oldest) college;
    /// a missing college surfaces as [`DatabaseError::InvalidReference`].
    pub async fn create(&self, request: &CreateUserRequest) -> DatabaseResult<User> {
        let id = Uuid::new_v4();
        let now = timestamp();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, avatar, year, department, college_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?,
                    COALESCE(?, (SELECT id FROM colleges ORDER BY created_at ASC, rowid ASC LIMIT 1)),
                    ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.avatar)
        .bind(&request.year)
        .bind(&request.department)
        .bind(request.college_id.map(|id| id.to_string()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::InvalidReference(_) => DatabaseError::InvalidReference(match request.college_id {
                Some(college_id) => format!("college {college_id} does not exist"),
                None => "no college exists to assign the user to".to_string(),
            }),
            other => other,
        })?;

        info!(user_id = %id, email = %request.email, "created user");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", id))
    }

    /// Overwrite every mutable field of a user
    pub async fn update(&self, id: Uuid, request: &UpdateUserRequest) -> DatabaseResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, avatar = ?, year = ?, department = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.avatar)
        .bind(&request.year)
        .bind(&request.department)
        .bind(timestamp())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("user", id));
        }

        info!(user_id = %id, "updated user");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", id))
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
