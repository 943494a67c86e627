//! ConversationStore trait definition.

use parley_types::conversation::Conversation;
use parley_types::error::RepositoryError;

/// Keyed load/save of conversation state by talker id.
///
/// The dialog session loads once when it starts and writes through on every
/// mutation. Implementations are expected to serialize concurrent access to
/// the same key themselves; concurrent writers for one talker are
/// last-write-wins.
///
/// Implementations live in parley-infra (e.g., `SqliteConversationStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationStore: Send + Sync {
    /// Load the conversation for a talker. Returns None for unknown talkers.
    fn get(
        &self,
        talker: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Insert or replace the conversation keyed by its talker.
    fn put(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
