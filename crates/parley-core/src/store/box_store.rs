//! BoxConversationStore -- object-safe dynamic dispatch wrapper for ConversationStore.
//!
//! 1. Define an object-safe `ConversationStoreDyn` trait with boxed futures
//! 2. Blanket-impl `ConversationStoreDyn` for all `T: ConversationStore`
//! 3. `BoxConversationStore` wraps `Box<dyn ConversationStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::conversation::Conversation;
use parley_types::error::RepositoryError;

use super::conversation::ConversationStore;

/// Object-safe version of [`ConversationStore`] with boxed futures.
pub trait ConversationStoreDyn: Send + Sync {
    fn get_boxed<'a>(
        &'a self,
        talker: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Conversation>, RepositoryError>> + Send + 'a>>;

    fn put_boxed<'a>(
        &'a self,
        conversation: &'a Conversation,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;
}

impl<T: ConversationStore> ConversationStoreDyn for T {
    fn get_boxed<'a>(
        &'a self,
        talker: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Conversation>, RepositoryError>> + Send + 'a>>
    {
        Box::pin(self.get(talker))
    }

    fn put_boxed<'a>(
        &'a self,
        conversation: &'a Conversation,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.put(conversation))
    }
}

/// Type-erased conversation store for runtime backend selection.
///
/// `ConversationStore` uses RPITIT and cannot be a trait object directly;
/// this wrapper restores dynamic dispatch and itself implements the trait,
/// so a `Chat<BoxConversationStore>` works with any backend.
pub struct BoxConversationStore {
    inner: Box<dyn ConversationStoreDyn + Send + Sync>,
}

impl BoxConversationStore {
    /// Wrap a concrete store in a type-erased box.
    pub fn new<T: ConversationStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl ConversationStore for BoxConversationStore {
    async fn get(&self, talker: &str) -> Result<Option<Conversation>, RepositoryError> {
        self.inner.get_boxed(talker).await
    }

    async fn put(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        self.inner.put_boxed(conversation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        rows: Mutex<HashMap<String, Conversation>>,
    }

    impl ConversationStore for MapStore {
        async fn get(&self, talker: &str) -> Result<Option<Conversation>, RepositoryError> {
            Ok(self.rows.lock().unwrap().get(talker).cloned())
        }

        async fn put(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(conversation.talker.clone(), conversation.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_box_store_delegates() {
        let store = BoxConversationStore::new(MapStore::default());
        assert!(store.get("alice").await.unwrap().is_none());

        let mut conv = Conversation::new("alice");
        conv.ongoing = true;
        store.put(&conv).await.unwrap();

        let loaded = store.get("alice").await.unwrap().unwrap();
        assert!(loaded.ongoing);
    }
}
