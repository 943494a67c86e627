//! Interface registry for alias lookup.
//!
//! Maps every alias to the interface that answers to it. Built once at
//! startup through explicit registration; the dialog session only reads it.

use std::collections::HashMap;
use std::sync::Arc;

use parley_types::error::RegistryError;

use super::box_interface::BoxInterface;
use super::plugin::Interface;

/// Alias-indexed table of interfaces.
///
/// Registration is all-or-nothing: an interface whose aliases collide with
/// anything already registered is rejected without inserting any of its
/// aliases, and a batch passed to [`load`](Self::load) is rejected as a whole.
#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    interfaces: HashMap<String, Arc<BoxInterface>>,
}

impl InterfaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed interface under all of its aliases.
    pub fn register<T: Interface + 'static>(&mut self, interface: T) -> Result<(), RegistryError> {
        self.register_boxed(BoxInterface::new(interface))
    }

    /// Register an already type-erased interface.
    pub fn register_boxed(&mut self, interface: BoxInterface) -> Result<(), RegistryError> {
        insert_checked(&mut self.interfaces, interface)
    }

    /// Register a batch of interfaces, aborting the whole batch on the first
    /// collision.
    pub fn load(
        &mut self,
        interfaces: impl IntoIterator<Item = BoxInterface>,
    ) -> Result<(), RegistryError> {
        let mut staged = self.interfaces.clone();
        for interface in interfaces {
            insert_checked(&mut staged, interface)?;
        }
        self.interfaces = staged;
        Ok(())
    }

    /// Look up the interface answering to an alias.
    pub fn get(&self, alias: &str) -> Option<&BoxInterface> {
        self.interfaces.get(alias).map(|i| i.as_ref())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.interfaces.contains_key(alias)
    }

    /// All registered aliases, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.interfaces.keys().map(|s| s.as_str()).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

fn insert_checked(
    table: &mut HashMap<String, Arc<BoxInterface>>,
    interface: BoxInterface,
) -> Result<(), RegistryError> {
    let aliases = interface.aliases();
    if aliases.is_empty() {
        return Err(RegistryError::NoAliases);
    }
    if let Some(taken) = aliases.iter().find(|alias| table.contains_key(alias.as_str())) {
        return Err(RegistryError::AliasCollision {
            alias: taken.clone(),
        });
    }

    let interface = Arc::new(interface);
    for alias in aliases {
        tracing::debug!(%alias, "Registered interface alias");
        table.insert(alias, Arc::clone(&interface));
    }
    Ok(())
}
