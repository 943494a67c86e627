//! Gateway state wiring the dialog engine to its adapters.
//!
//! `GatewayState` is built once at startup and cloned into every connection
//! task. The interface registry is fully populated here; an alias collision
//! aborts startup before the listener is bound.
//!
//! Without a database, each connection gets its own in-memory store that is
//! dropped with the connection. Talker ids are peer addresses, so a shared
//! map would only ever grow.

use std::sync::Arc;

use parley_core::chat::ChatContext;
use parley_core::interface::builtin::{EchoInterface, FormInterface, HelpInterface};
use parley_core::interface::{BoxInterface, InterfaceRegistry};
use parley_core::matcher::FuzzyMatcher;
use parley_core::store::BoxConversationStore;
use parley_infra::matcher::IndelRatioMatcher;
use parley_infra::memory::InMemoryConversationStore;
use parley_infra::sqlite::{DatabasePool, SqliteConversationStore};
use parley_types::config::{GatewayConfig, HandshakeLimits};
use parley_types::error::RegistryError;

/// Shared state handed to every connection.
#[derive(Clone)]
pub struct GatewayState {
    pub chat: ChatContext<BoxConversationStore>,
    /// Bot name sent as `author` in outbound packets.
    pub author: Arc<str>,
    pub limits: Arc<HandshakeLimits>,
    /// Give every connection a fresh in-memory store instead of `chat.store`.
    pub store_per_connection: bool,
}

impl GatewayState {
    /// Open the configured store and build the registry.
    pub async fn init(config: &GatewayConfig) -> anyhow::Result<Self> {
        match &config.database {
            Some(path) => {
                let pool = DatabasePool::open(path).await?;
                tracing::info!(database = %path.display(), "Using SQLite conversation store");
                let store = BoxConversationStore::new(SqliteConversationStore::new(pool));
                Ok(Self::with_store(config, store)?)
            }
            None => {
                tracing::info!("Using in-memory conversation store per connection");
                let store = BoxConversationStore::new(InMemoryConversationStore::new());
                let mut state = Self::with_store(config, store)?;
                state.store_per_connection = true;
                Ok(state)
            }
        }
    }

    /// Build the state around an already opened store.
    pub fn with_store(
        config: &GatewayConfig,
        store: BoxConversationStore,
    ) -> Result<Self, RegistryError> {
        let registry = build_registry(config)?;
        tracing::info!(aliases = registry.len(), "Interfaces registered");

        let matcher: Arc<dyn FuzzyMatcher> = Arc::new(IndelRatioMatcher::new());
        Ok(Self {
            chat: ChatContext {
                store: Arc::new(store),
                registry: Arc::new(registry),
                matcher,
                settings: Arc::new(config.chat.clone()),
            },
            author: Arc::from(config.author.as_str()),
            limits: Arc::new(config.handshake.clone()),
            store_per_connection: false,
        })
    }

    /// Dialog context for one new connection.
    pub fn connection_context(&self) -> ChatContext<BoxConversationStore> {
        if self.store_per_connection {
            ChatContext {
                store: Arc::new(BoxConversationStore::new(InMemoryConversationStore::new())),
                ..self.chat.clone()
            }
        } else {
            self.chat.clone()
        }
    }
}

/// Register the built-in interfaces and every configured form.
///
/// The whole set is loaded as one batch: any alias collision rejects it.
pub fn build_registry(config: &GatewayConfig) -> Result<InterfaceRegistry, RegistryError> {
    let mut interfaces = vec![
        BoxInterface::new(HelpInterface::new(&config.chat.help_alias)),
        BoxInterface::new(EchoInterface),
    ];
    interfaces.extend(config.forms.iter().map(|form| {
        BoxInterface::new(FormInterface::new(
            form,
            config.chat.attachment_skip_threshold,
        ))
    }));

    let mut registry = InterfaceRegistry::new();
    registry.load(interfaces)?;
    Ok(registry)
}
