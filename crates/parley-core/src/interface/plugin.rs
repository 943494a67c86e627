//! Interface trait and the package handed to `consume`.

use std::collections::BTreeSet;

use parley_types::conversation::{Conversation, Message};
use parley_types::error::InterfaceError;
use tokio::sync::mpsc::UnboundedSender;

use crate::matcher::FuzzyMatcher;

/// Callback through which replies reach the talker, in send order.
pub type ReplySender = UnboundedSender<Message>;

/// Everything an interface sees during one turn.
pub struct Package<'a> {
    /// The inbound message. Its text is empty on the turn that selected the
    /// subject, because subject recognition consumes it.
    pub message: &'a Message,
    pub conversation: &'a mut Conversation,
    pub callback: &'a ReplySender,
    pub matcher: &'a dyn FuzzyMatcher,
    /// Every registered alias, sorted.
    pub commands: &'a [String],
}

impl Package<'_> {
    /// Send a text reply to the talker.
    pub fn reply(&self, text: impl Into<String>) {
        if self.callback.send(Message::text(text)).is_err() {
            tracing::debug!(
                talker = %self.conversation.talker,
                "Reply dropped, talker is gone"
            );
        }
    }
}

/// A pluggable command handler bound to one or more aliases.
///
/// Implementations must be stateless with respect to talkers: a single
/// instance serves every connection, so all per-talker progress belongs in
/// the [`Conversation`] (`data` and `attachment`).
pub trait Interface: Send + Sync {
    /// Command names as typed by the talker.
    fn aliases(&self) -> BTreeSet<String>;

    /// Handle one turn while this interface's alias is the active subject.
    fn consume(
        &self,
        package: &mut Package<'_>,
    ) -> impl std::future::Future<Output = Result<(), InterfaceError>> + Send;

    /// Whether the subject is finished for this conversation.
    ///
    /// Checked after every `consume`; returning true resets the conversation
    /// so the next message starts fresh subject detection.
    fn is_complete(&self, _conversation: &Conversation) -> bool {
        true
    }
}
