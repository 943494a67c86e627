use std::collections::BTreeSet;

use parley_types::error::InterfaceError;

use crate::interface::plugin::{Interface, Package};

/// Lists every command the gateway answers to.
pub struct HelpInterface {
    aliases: BTreeSet<String>,
}

impl HelpInterface {
    /// `fallback_alias` is the subject the dialog engine assigns when it did
    /// not understand a request; it is registered alongside `help`.
    pub fn new(fallback_alias: &str) -> Self {
        let mut aliases = BTreeSet::from(["help".to_string()]);
        aliases.insert(fallback_alias.to_string());
        Self { aliases }
    }
}

impl Interface for HelpInterface {
    fn aliases(&self) -> BTreeSet<String> {
        self.aliases.clone()
    }

    async fn consume(&self, package: &mut Package<'_>) -> Result<(), InterfaceError> {
        let others: Vec<&str> = package
            .commands
            .iter()
            .filter(|c| !self.aliases.contains(*c))
            .map(|c| c.as_str())
            .collect();

        if others.is_empty() {
            package.reply("I have no commands to offer yet.");
        } else {
            package.reply(format!("Try asking:\n{}", others.join("\n")));
        }
        Ok(())
    }
}
