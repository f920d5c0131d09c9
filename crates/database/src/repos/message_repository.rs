//! Repository for chat messages.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{timestamp, user_summary_from_row, uuid_column};
use crate::entities::{CreateMessageRequest, Message};
use crate::types::{DatabaseError, DatabaseResult};

const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.chat_id, m.text, m.created_at,
           u.id AS sender_id, u.name AS sender_name, u.email AS sender_email, u.avatar AS sender_avatar
    FROM messages m
    JOIN users u ON u.id = m.sender_id
"#;

fn message_from_row(row: &SqliteRow) -> DatabaseResult<Message> {
    Ok(Message {
        id: uuid_column(row, "id")?,
        chat_id: uuid_column(row, "chat_id")?,
        sender: user_summary_from_row(row, "sender_")?,
        text: row.try_get("text")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Message>> {
        let row = sqlx::query(&format!("{MESSAGE_SELECT} WHERE m.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| message_from_row(&row)).transpose()
    }

    /// Messages of a chat in the order they were sent
    pub async fn list_for_chat(&self, chat_id: Uuid) -> DatabaseResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "{MESSAGE_SELECT} WHERE m.chat_id = ? ORDER BY m.created_at ASC, m.rowid ASC"
        ))
        .bind(chat_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(message_from_row).collect()
    }

    /// Append a message and bump the chat's activity timestamp in one transaction
    pub async fn create(&self, chat_id: Uuid, request: &CreateMessageRequest) -> DatabaseResult<Message> {
        let id = Uuid::new_v4();
        let now = timestamp();

        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE chats SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(chat_id.to_string())
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(DatabaseError::not_found("chat", chat_id));
        }

        sqlx::query("INSERT INTO messages (id, chat_id, sender_id, text, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(chat_id.to_string())
            .bind(request.sender_id.to_string())
            .bind(&request.text)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::InvalidReference(_) => DatabaseError::InvalidReference(format!(
                    "sender {} does not exist",
                    request.sender_id
                )),
                other => other,
            })?;

        tx.commit().await?;

        info!(message_id = %id, chat_id = %chat_id, sender_id = %request.sender_id, "created message");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("message", id))
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CreateChatRequest;
    use crate::repos::ChatRepository;
    use crate::test_support::{seed_college, seed_user, test_pool};

    #[tokio::test]
    async fn test_messages_are_listed_in_send_order() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let alice = seed_user(&pool, college.id, "alice@state.edu").await;
        let bob = seed_user(&pool, college.id, "bob@state.edu").await;
        let chat = ChatRepository::new(pool.clone())
            .create(&CreateChatRequest { product_id: None, participants: vec![alice.id, bob.id] })
            .await
            .unwrap();
        let repo = MessageRepository::new(pool);

        for (sender, text) in [(alice.id, "hi"), (bob.id, "hello"), (alice.id, "still for sale?")] {
            repo.create(chat.id, &CreateMessageRequest { sender_id: sender, text: text.to_string() })
                .await
                .unwrap();
        }

        let messages = repo.list_for_chat(chat.id).await.unwrap();
        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hi", "hello", "still for sale?"]);
        assert_eq!(messages[1].sender.id, bob.id);
        assert!(messages.iter().all(|m| m.chat_id == chat.id));
    }

    #[tokio::test]
    async fn test_message_bumps_chat_activity() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let alice = seed_user(&pool, college.id, "alice@state.edu").await;
        let chats = ChatRepository::new(pool.clone());
        let chat = chats
            .create(&CreateChatRequest { product_id: None, participants: vec![alice.id] })
            .await
            .unwrap();
        let repo = MessageRepository::new(pool);

        let message = repo
            .create(chat.id, &CreateMessageRequest { sender_id: alice.id, text: "note".to_string() })
            .await
            .unwrap();

        let reloaded = chats.find_by_id(chat.id).await.unwrap().unwrap();
        assert_eq!(reloaded.updated_at, message.created_at);
        assert!(reloaded.updated_at >= chat.updated_at);
    }

    #[tokio::test]
    async fn test_message_to_missing_chat_is_not_found() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let alice = seed_user(&pool, college.id, "alice@state.edu").await;
        let repo = MessageRepository::new(pool);

        let error = repo
            .create(Uuid::new_v4(), &CreateMessageRequest { sender_id: alice.id, text: "x".to_string() })
            .await
            .unwrap_err();

        assert!(error.is_not_found());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_message_from_unknown_sender_is_invalid_reference() {
        let (pool, _temp_dir) = test_pool().await;
        let college = seed_college(&pool, "state.edu").await;
        let alice = seed_user(&pool, college.id, "alice@state.edu").await;
        let chat = ChatRepository::new(pool.clone())
            .create(&CreateChatRequest { product_id: None, participants: vec![alice.id] })
            .await
            .unwrap();
        let repo = MessageRepository::new(pool);

        let error = repo
            .create(chat.id, &CreateMessageRequest { sender_id: Uuid::new_v4(), text: "x".to_string() })
            .await
            .unwrap_err();

        assert!(matches!(error, DatabaseError::InvalidReference(_)));
    }
}
