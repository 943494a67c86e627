//! BoxInterface -- object-safe dynamic dispatch wrapper for Interface.
//!
//! Same blanket-impl pattern as `BoxConversationStore`:
//! 1. Define an object-safe `InterfaceDyn` trait with boxed futures
//! 2. Blanket-impl `InterfaceDyn` for all `T: Interface`
//! 3. `BoxInterface` wraps `Box<dyn InterfaceDyn>` and delegates

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use parley_types::conversation::Conversation;
use parley_types::error::InterfaceError;

use super::plugin::{Interface, Package};

/// Object-safe version of [`Interface`] with a boxed `consume` future.
pub trait InterfaceDyn: Send + Sync {
    fn aliases(&self) -> BTreeSet<String>;

    fn consume_boxed<'a>(
        &'a self,
        package: &'a mut Package<'_>,
    ) -> Pin<Box<dyn Future<Output = Result<(), InterfaceError>> + Send + 'a>>;

    fn is_complete(&self, conversation: &Conversation) -> bool;
}

impl<T: Interface> InterfaceDyn for T {
    fn aliases(&self) -> BTreeSet<String> {
        Interface::aliases(self)
    }

    fn consume_boxed<'a>(
        &'a self,
        package: &'a mut Package<'_>,
    ) -> Pin<Box<dyn Future<Output = Result<(), InterfaceError>> + Send + 'a>> {
        Box::pin(self.consume(package))
    }

    fn is_complete(&self, conversation: &Conversation) -> bool {
        Interface::is_complete(self, conversation)
    }
}

/// Type-erased interface, the unit stored in the registry.
pub struct BoxInterface {
    inner: Box<dyn InterfaceDyn + Send + Sync>,
}

impl BoxInterface {
    /// Wrap a concrete interface in a type-erased box.
    pub fn new<T: Interface + 'static>(interface: T) -> Self {
        Self {
            inner: Box::new(interface),
        }
    }

    pub fn aliases(&self) -> BTreeSet<String> {
        self.inner.aliases()
    }

    pub async fn consume(&self, package: &mut Package<'_>) -> Result<(), InterfaceError> {
        self.inner.consume_boxed(package).await
    }

    pub fn is_complete(&self, conversation: &Conversation) -> bool {
        self.inner.is_complete(conversation)
    }
}

impl std::fmt::Debug for BoxInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxInterface")
            .field("aliases", &self.inner.aliases())
            .finish()
    }
}
