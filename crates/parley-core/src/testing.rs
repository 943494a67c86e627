//! Test doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use parley_types::conversation::{Conversation, Message};
use parley_types::error::RepositoryError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::matcher::{FuzzyMatcher, Match};
use crate::store::ConversationStore;

/// Scores 100 for a case-insensitive exact match, 0 otherwise.
pub struct ExactMatcher;

impl FuzzyMatcher for ExactMatcher {
    fn best_match<'a>(&self, text: &str, candidates: &[&'a str]) -> Option<Match<'a>> {
        let text = text.trim().to_lowercase();
        candidates
            .iter()
            .copied()
            .map(|c| Match {
                candidate: c,
                score: if c.to_lowercase() == text { 100 } else { 0 },
            })
            .fold(None, |best: Option<Match<'a>>, m| match best {
                Some(b) if b.score >= m.score => Some(b),
                _ => Some(m),
            })
    }
}

/// In-memory store that counts writes.
#[derive(Default)]
pub struct RecordingStore {
    pub rows: Mutex<HashMap<String, Conversation>>,
    pub puts: Mutex<usize>,
}

impl RecordingStore {
    pub fn with(conversation: Conversation) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .unwrap()
            .insert(conversation.talker.clone(), conversation);
        store
    }

    pub fn stored(&self, talker: &str) -> Option<Conversation> {
        self.rows.lock().unwrap().get(talker).cloned()
    }

    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap()
    }
}

impl ConversationStore for RecordingStore {
    async fn get(&self, talker: &str) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.stored(talker))
    }

    async fn put(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        *self.puts.lock().unwrap() += 1;
        self.rows
            .lock()
            .unwrap()
            .insert(conversation.talker.clone(), conversation.clone());
        Ok(())
    }
}

/// Collect every reply queued so far.
pub fn drain(rx: &mut UnboundedReceiver<Message>) -> Vec<String> {
    let mut texts = Vec::new();
    while let Ok(message) = rx.try_recv() {
        texts.push(message.text);
    }
    texts
}
