//! Repository for chat data access operations.

use std::collections::HashMap;

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{optional_uuid_column, timestamp, user_summary_from_row, uuid_column};
use crate::entities::{Chat, ChatFilter, CreateChatRequest, UserSummary};
use crate::types::{DatabaseError, DatabaseResult};

const PARTICIPANT_SELECT: &str = r#"
    SELECT cp.chat_id, u.id AS user_id, u.name AS user_name, u.email AS user_email, u.avatar AS user_avatar
    FROM chat_participants cp
    JOIN users u ON u.id = cp.user_id
"#;

fn chat_from_row(row: &SqliteRow, participants: Vec<UserSummary>) -> DatabaseResult<Chat> {
    Ok(Chat {
        id: uuid_column(row, "id")?,
        product_id: optional_uuid_column(row, "product_id")?,
        participants,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Repository for chat database operations
#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    /// Create a new chat repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a chat with its participants
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Chat>> {
        let Some(row) = sqlx::query("SELECT id, product_id, created_at, updated_at FROM chats WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let participant_rows = sqlx::query(&format!(
            "{PARTICIPANT_SELECT} WHERE cp.chat_id = ? ORDER BY cp.joined_at ASC, cp.rowid ASC"
        ))
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let participants = participant_rows
            .iter()
            .map(|row| user_summary_from_row(row, "user_"))
            .collect::<DatabaseResult<Vec<_>>>()?;

        chat_from_row(&row, participants).map(Some)
    }

    pub async fn exists(&self, id: Uuid) -> DatabaseResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM chats WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// List chats, most recently active first. Participants are loaded with one extra query
    /// for the whole page rather than one per chat.
    pub async fn list(&self, filter: &ChatFilter) -> DatabaseResult<Vec<Chat>> {
        let user_id = filter.user_id.map(|id| id.to_string());

        let rows = sqlx::query(
            r#"
            SELECT c.id, c.product_id, c.created_at, c.updated_at
            FROM chats c
            WHERE ?1 IS NULL
               OR EXISTS (SELECT 1 FROM chat_participants x WHERE x.chat_id = c.id AND x.user_id = ?1)
            ORDER BY c.updated_at DESC, c.rowid DESC
            "#,
        )
        .bind(&user_id)
        .fetch_all(&self.pool)
        .await?;

        let participant_rows = sqlx::query(&format!(
            r#"{PARTICIPANT_SELECT}
            WHERE ?1 IS NULL
               OR cp.chat_id IN (SELECT x.chat_id FROM chat_participants x WHERE x.user_id = ?1)
            ORDER BY cp.joined_at ASC, cp.rowid ASC"#
        ))
        .bind(&user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut participants: HashMap<Uuid, Vec<UserSummary>> = HashMap::new();
        for row in &participant_rows {
            participants
                .entry(uuid_column(row, "chat_id")?)
                .or_default()
                .push(user_summary_from_row(row, "user_")?);
        }

        rows.iter()
            .map(|row| {
                let id = uuid_column(row, "id")?;
                chat_from_row(row, participants.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    /// Create a chat and its participant rows in one transaction. Repeated participant ids are
    /// collapsed; unknown users or products surface as [`DatabaseError::InvalidReference`].
    pub async fn create(&self, request: &CreateChatRequest) -> DatabaseResult<Chat> {
        let id = Uuid::new_v4();
        let now = timestamp();

        let mut participant_ids: Vec<Uuid> = Vec::with_capacity(request.participants.len());
        for participant in &request.participants {
            if !participant_ids.contains(participant) {
                participant_ids.push(*participant);
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO chats (id, product_id, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(request.product_id.map(|id| id.to_string()))
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::InvalidReference(_) => DatabaseError::InvalidReference(format!(
                    "product {} does not exist",
                    request.product_id.map(|id| id.to_string()).unwrap_or_default()
                )),
                other => other,
            })?;

        for participant in &participant_ids {
            sqlx::query("INSERT INTO chat_participants (chat_id, user_id, joined_at) VALUES (?, ?, ?)")
                .bind(id.to_string())
                .bind(participant.to_string())
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(|e| match DatabaseError::from(e) {
                    DatabaseError::InvalidReference(_) => {
                        DatabaseError::InvalidReference(format!("user {participant} does not exist"))
                    }
                    other => other,
                })?;
        }

        tx.commit().await?;

        info!(
            chat_id = %id,
            participants = participant_ids.len(),
            "created chat"
        );

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("chat", id))
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
