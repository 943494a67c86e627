//! In-memory conversation store.
//!
//! Used when no database is configured, one store per connection.
//! Conversations live as long as the store; `DashMap` serializes access per
//! key without a global lock.

use dashmap::DashMap;
use parley_core::store::ConversationStore;
use parley_types::conversation::Conversation;
use parley_types::error::RepositoryError;

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: DashMap<String, Conversation>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of talkers seen so far.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, talker: &str) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.conversations.get(talker).map(|c| c.value().clone()))
    }

    async fn put(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        self.conversations
            .insert(conversation.talker.clone(), conversation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryConversationStore::new();
        assert!(store.get("alice").await.unwrap().is_none());

        let mut conv = Conversation::new("alice");
        conv.subject = "echo".to_string();
        store.put(&conv).await.unwrap();

        assert_eq!(store.get("alice").await.unwrap(), Some(conv));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = InMemoryConversationStore::new();
        let mut conv = Conversation::new("alice");
        store.put(&conv).await.unwrap();

        conv.ongoing = true;
        store.put(&conv).await.unwrap();

        assert!(store.get("alice").await.unwrap().unwrap().ongoing);
        assert_eq!(store.len(), 1);
    }
}
