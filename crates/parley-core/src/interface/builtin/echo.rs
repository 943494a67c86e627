use std::collections::BTreeSet;

use parley_types::conversation::Conversation;
use parley_types::error::InterfaceError;

use crate::interface::plugin::{Interface, Package};

/// Sends back whatever it receives. Stays active until the talker cancels.
pub struct EchoInterface;

impl Interface for EchoInterface {
    fn aliases(&self) -> BTreeSet<String> {
        BTreeSet::from(["echo".to_string(), "ping pong".to_string()])
    }

    async fn consume(&self, package: &mut Package<'_>) -> Result<(), InterfaceError> {
        let text = package.message.text.clone();
        if text.trim().is_empty() {
            package.reply("Send me anything and I will send it back. Say 'stop' when done.");
        } else {
            package.reply(text);
        }
        Ok(())
    }

    fn is_complete(&self, _conversation: &Conversation) -> bool {
        false
    }
}
