//! SQLite conversation store implementation.
//!
//! Implements `ConversationStore` from `parley-core`. The field map is stored
//! as JSON text; the attachment as a BLOB.

use chrono::Utc;
use parley_core::store::ConversationStore;
use parley_types::conversation::Conversation;
use parley_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationStore`.
pub struct SqliteConversationStore {
    pool: DatabasePool,
}

impl SqliteConversationStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConversationRow {
    talker: String,
    ongoing: bool,
    subject: String,
    data: String,
    attachment: Vec<u8>,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            talker: row.try_get("talker")?,
            ongoing: row.try_get("ongoing")?,
            subject: row.try_get("subject")?,
            data: row.try_get("data")?,
            attachment: row.try_get("attachment")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let data = serde_json::from_str(&self.data)
            .map_err(|e| RepositoryError::Serialization(format!("invalid data JSON: {e}")))?;

        Ok(Conversation {
            talker: self.talker,
            ongoing: self.ongoing,
            subject: self.subject,
            data,
            attachment: self.attachment,
        })
    }
}

impl ConversationStore for SqliteConversationStore {
    async fn get(&self, talker: &str) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT talker, ongoing, subject, data, attachment FROM conversations WHERE talker = ?",
        )
        .bind(talker)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let data = serde_json::to_string(&conversation.data)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO conversations (talker, ongoing, subject, data, attachment, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (talker) DO UPDATE SET
                   ongoing = excluded.ongoing,
                   subject = excluded.subject,
                   data = excluded.data,
                   attachment = excluded.attachment,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&conversation.talker)
        .bind(conversation.ongoing)
        .bind(&conversation.subject)
        .bind(&data)
        .bind(&conversation.attachment)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tracing::trace!(talker = %conversation.talker, subject = %conversation.subject, "Conversation saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_store() -> (SqliteConversationStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("test.db")).await.unwrap();
        (SqliteConversationStore::new(pool), dir)
    }

    #[tokio::test]
    async fn test_get_unknown_talker_returns_none() {
        let (store, _dir) = test_store().await;
        assert!(store.get("10.0.0.1:5000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let (store, _dir) = test_store().await;

        let mut conv = Conversation::new("10.0.0.1:5000");
        conv.ongoing = true;
        conv.subject = "add partner".to_string();
        conv.data.insert("name".to_string(), json!("ACME"));
        conv.data.insert("employees".to_string(), json!(12));
        conv.attachment = vec![0, 159, 146, 150];
        store.put(&conv).await.unwrap();

        let loaded = store.get("10.0.0.1:5000").await.unwrap().unwrap();
        assert_eq!(loaded, conv);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_talker() {
        let (store, _dir) = test_store().await;

        let mut conv = Conversation::new("alice");
        conv.subject = "echo".to_string();
        conv.data.insert("k".to_string(), json!("v"));
        store.put(&conv).await.unwrap();

        conv.reset();
        conv.ongoing = true;
        store.put(&conv).await.unwrap();

        let loaded = store.get("alice").await.unwrap().unwrap();
        assert!(loaded.ongoing);
        assert_eq!(loaded.subject, "");
        assert!(loaded.data.is_empty());

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.db");
        {
            let store = SqliteConversationStore::new(DatabasePool::open(&path).await.unwrap());
            let mut conv = Conversation::new("bob");
            conv.ongoing = true;
            store.put(&conv).await.unwrap();
        }

        let store = SqliteConversationStore::new(DatabasePool::open(&path).await.unwrap());
        assert!(store.get("bob").await.unwrap().unwrap().ongoing);
    }
}
