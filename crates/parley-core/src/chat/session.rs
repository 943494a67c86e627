//! Dialog session for one talker.
//!
//! `Chat` drives the per-talker state machine:
//!
//! ```text
//! Idle --greet/ask--> Ongoing/NoSubject --subject matched--> Ongoing/SubjectActive
//!                            ^                                      |
//!                            +------- cancel / complete / error ----+
//! ```
//!
//! Every mutation of the conversation is written through to the store before
//! the next step runs.

use std::sync::Arc;

use parley_types::config::ChatSettings;
use parley_types::conversation::{Conversation, Message};
use parley_types::error::ChatError;

use crate::interface::plugin::{Package, ReplySender};
use crate::interface::registry::InterfaceRegistry;
use crate::matcher::FuzzyMatcher;
use crate::store::ConversationStore;

const INTRO: [&str; 2] = [
    "Hello! I am a bot and I represent the company that made me and can make others similar to me.",
    "I can do a few things. Ask me for example to fill in a form, or say 'help'.",
];
const WELCOME_BACK: &str = "Hey. What would you like me to do?";
const NOT_UNDERSTOOD: &str =
    "I didn't get it. Would you like me to send the full list of commands?";
const START_OVER: &str = "OK. Let's start over.";
const TASK_FAILED: &str = "Sorry, something went wrong with that. Let's start over.";

/// Shared collaborators every session needs.
///
/// Built once at startup and cloned into each connection.
pub struct ChatContext<S> {
    pub store: Arc<S>,
    pub registry: Arc<InterfaceRegistry>,
    pub matcher: Arc<dyn FuzzyMatcher>,
    pub settings: Arc<ChatSettings>,
}

impl<S> Clone for ChatContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            matcher: Arc::clone(&self.matcher),
            settings: Arc::clone(&self.settings),
        }
    }
}

/// Conversation state machine for a single talker.
pub struct Chat<S: ConversationStore> {
    conversation: Conversation,
    ctx: ChatContext<S>,
    callback: ReplySender,
    /// Registered aliases, sorted. Fixed for the lifetime of the session.
    commands: Vec<String>,
}

impl<S: ConversationStore> Chat<S> {
    /// Load the talker's conversation from the store, or start a fresh one.
    pub async fn load(
        talker: &str,
        ctx: ChatContext<S>,
        callback: ReplySender,
    ) -> Result<Self, ChatError> {
        let conversation = match ctx.store.get(talker).await? {
            Some(conversation) => {
                tracing::debug!(
                    talker,
                    ongoing = conversation.ongoing,
                    subject = %conversation.subject,
                    "Resumed conversation"
                );
                conversation
            }
            None => Conversation::new(talker),
        };
        let commands = ctx
            .registry
            .aliases()
            .into_iter()
            .map(String::from)
            .collect();

        Ok(Self {
            conversation,
            ctx,
            callback,
            commands,
        })
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn talker(&self) -> &str {
        &self.conversation.talker
    }

    pub fn ongoing(&self) -> bool {
        self.conversation.ongoing
    }

    pub fn subject(&self) -> &str {
        &self.conversation.subject
    }

    /// Send the opening message(s) of a connection.
    pub async fn greet(&mut self) -> Result<(), ChatError> {
        if self.conversation.ongoing {
            self.send(WELCOME_BACK);
        } else {
            for line in INTRO {
                self.send(line);
            }
            self.set_ongoing(true).await?;
        }
        Ok(())
    }

    /// Handle one inbound message and emit the replies through the callback.
    pub async fn ask(&mut self, mut message: Message) -> Result<(), ChatError> {
        if !self.conversation.ongoing {
            self.set_ongoing(true).await?;
        }

        if self.conversation.has_subject() {
            return self.do_subject(&mut message).await;
        }

        if self.get_subject(&mut message).await?.is_some() {
            return self.do_subject(&mut message).await;
        }

        self.send(NOT_UNDERSTOOD);
        let fallback = self.ctx.settings.help_alias.clone();
        if self.ctx.registry.contains(&fallback) {
            self.set_subject(fallback).await?;
        }
        Ok(())
    }

    /// Try to recognize a subject in the message.
    ///
    /// The message text is consumed whatever the outcome, so the interface
    /// that takes over never sees the command phrase as input. Returns the
    /// selected alias.
    pub async fn get_subject(&mut self, message: &mut Message) -> Result<Option<String>, ChatError> {
        let best = {
            let candidates: Vec<&str> = self.commands.iter().map(String::as_str).collect();
            self.ctx
                .matcher
                .best_match(&message.text, &candidates)
                .map(|m| (m.candidate.to_string(), m.score))
        };
        message.text.clear();

        match best {
            Some((alias, score)) if score >= self.ctx.settings.subject_threshold => {
                tracing::debug!(talker = %self.conversation.talker, subject = %alias, score, "Subject recognized");
                self.set_subject(alias.clone()).await?;
                Ok(Some(alias))
            }
            best => {
                tracing::debug!(
                    talker = %self.conversation.talker,
                    score = ?best.map(|(_, score)| score),
                    "No subject recognized"
                );
                Ok(None)
            }
        }
    }

    /// Continue on the active subject: cancel it, or hand the turn to its
    /// interface and reset once the interface reports completion.
    pub async fn do_subject(&mut self, message: &mut Message) -> Result<(), ChatError> {
        if self.is_cancel(&message.text) {
            tracing::debug!(talker = %self.conversation.talker, subject = %self.conversation.subject, "Subject cancelled");
            self.send(START_OVER);
            return self.clean().await;
        }

        let subject = self.conversation.subject.clone();
        let registry = Arc::clone(&self.ctx.registry);
        let Some(interface) = registry.get(&subject) else {
            tracing::warn!(talker = %self.conversation.talker, %subject, "Active subject is not registered");
            self.send(format!(
                "Ups. I am confused, don't know what to do with '{subject}'"
            ));
            return self.clean().await;
        };

        let result = {
            let mut package = Package {
                message: &*message,
                conversation: &mut self.conversation,
                callback: &self.callback,
                matcher: self.ctx.matcher.as_ref(),
                commands: &self.commands,
            };
            interface.consume(&mut package).await
        };

        if let Err(source) = result {
            self.send(TASK_FAILED);
            self.clean().await?;
            return Err(ChatError::Interface { subject, source });
        }

        self.persist().await?;
        if interface.is_complete(&self.conversation) {
            tracing::debug!(talker = %self.conversation.talker, %subject, "Subject complete");
            self.clean().await?;
        }
        Ok(())
    }

    pub async fn set_ongoing(&mut self, ongoing: bool) -> Result<(), ChatError> {
        self.conversation.ongoing = ongoing;
        self.persist().await
    }

    pub async fn set_subject(&mut self, subject: impl Into<String>) -> Result<(), ChatError> {
        self.conversation.subject = subject.into();
        self.persist().await
    }

    /// Reset subject, data and attachment. `ongoing` is kept.
    pub async fn clean(&mut self) -> Result<(), ChatError> {
        self.conversation.reset();
        self.persist().await
    }

    fn is_cancel(&self, text: &str) -> bool {
        let phrases: Vec<&str> = self
            .ctx
            .settings
            .cancel_phrases
            .iter()
            .map(String::as_str)
            .collect();
        self.ctx
            .matcher
            .best_match(text, &phrases)
            .is_some_and(|m| m.score > self.ctx.settings.cancel_threshold)
    }

    async fn persist(&self) -> Result<(), ChatError> {
        self.ctx.store.put(&self.conversation).await?;
        Ok(())
    }

    fn send(&self, text: impl Into<String>) {
        if self.callback.send(Message::text(text)).is_err() {
            tracing::debug!(talker = %self.conversation.talker, "Reply dropped, talker is gone");
        }
    }
}
